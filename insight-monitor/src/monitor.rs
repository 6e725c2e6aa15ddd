use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::gate::RateLimitGate;
use crate::probe::HealthProbe;
use crate::state::{
    ConnectionSnapshot, ConnectionState, MAX_RETRIES, backoff_delay,
};

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Ceiling for failure-driven retries; manual re-checks bypass it.
    pub max_retries: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
        }
    }
}

enum Command {
    Recheck { reply: oneshot::Sender<bool> },
}

/// Handle to the connection-state machine.
///
/// Spawning the monitor issues an immediate probe, then the driver task
/// retries on the progressive backoff schedule while disconnected, up to the
/// configured ceiling. Consumers read snapshots; nothing here ever panics or
/// returns an error for a failed probe.
pub struct ConnectionMonitor {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<ConnectionSnapshot>,
    cancel: CancellationToken,
}

impl ConnectionMonitor {
    pub fn spawn(
        prober: Arc<dyn HealthProbe>,
        gate: Arc<RateLimitGate>,
        config: MonitorConfig,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(16);
        let state = ConnectionState::new();
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());
        let cancel = CancellationToken::new();

        let driver = Driver {
            prober,
            gate,
            config,
            state,
            snapshots: snapshot_tx,
            commands: command_rx,
            cancel: cancel.clone(),
        };
        tokio::spawn(driver.run());

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            cancel,
        }
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn watch(&self) -> watch::Receiver<ConnectionSnapshot> {
        self.snapshots.clone()
    }

    /// Request a re-check and return the resulting connectivity.
    ///
    /// Dropped (returning the cached value) while a probe is already in
    /// flight or while the health gate's cooldown has not elapsed; otherwise
    /// the retry ceiling is bypassed, the retry count reset, and a fresh
    /// probe issued.
    pub async fn recheck(&self) -> bool {
        let current = self.snapshot();
        if current.is_checking {
            return current.is_connected;
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .commands
            .send(Command::Recheck { reply: reply_tx })
            .await
            .is_err()
        {
            return self.snapshot().is_connected;
        }
        reply_rx
            .await
            .unwrap_or_else(|_| self.snapshot().is_connected)
    }

    /// Stop the driver: pending backoff timers are cancelled and an
    /// in-flight probe's result is discarded without touching state.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ConnectionMonitor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Driver {
    prober: Arc<dyn HealthProbe>,
    gate: Arc<RateLimitGate>,
    config: MonitorConfig,
    state: ConnectionState,
    snapshots: watch::Sender<ConnectionSnapshot>,
    commands: mpsc::Receiver<Command>,
    cancel: CancellationToken,
}

impl Driver {
    async fn run(mut self) {
        // Initial probe on startup.
        self.gate.stamp();
        self.probe_once().await;

        loop {
            if self.cancel.is_cancelled() {
                return;
            }

            if self.state.retry_eligible(self.config.max_retries) {
                let attempt = self.state.retry_count + 1;
                self.state.retry_count = attempt;
                self.publish();
                let delay = backoff_delay(attempt);
                debug!(attempt, ?delay, "scheduling reconnect probe");
                if !self.wait_for_retry(Instant::now() + delay).await {
                    return;
                }
            } else {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return,
                    command = self.commands.recv() => match command {
                        Some(command) => self.handle(command).await,
                        None => return,
                    },
                }
            }
        }
    }

    /// Wait out a backoff delay. Returns false when the driver should exit.
    /// A manual re-check that actually probes abandons the pending timer
    /// (the loop reschedules from the fresh state); dropped re-checks leave
    /// it running.
    async fn wait_for_retry(&mut self, deadline: Instant) -> bool {
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return false,
                command = self.commands.recv() => match command {
                    Some(Command::Recheck { reply }) => {
                        if self.manual_probe(reply).await {
                            return true;
                        }
                    }
                    None => return false,
                },
                _ = time::sleep_until(deadline) => {
                    self.gate.stamp();
                    self.probe_once().await;
                    return true;
                }
            }
        }
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Recheck { reply } => {
                self.manual_probe(reply).await;
            }
        }
    }

    /// Returns true when a probe actually ran.
    async fn manual_probe(&mut self, reply: oneshot::Sender<bool>) -> bool {
        if !self.gate.try_acquire() {
            debug!("re-check rate limited; serving cached state");
            let _ = reply.send(self.state.is_connected);
            return false;
        }

        // Manual path: ceiling bypassed, retry count reset before probing.
        self.state.retry_count = 0;
        let healthy = self.probe_once().await;
        let _ = reply.send(healthy);
        true
    }

    async fn probe_once(&mut self) -> bool {
        self.state.begin_check();
        self.publish();

        let report = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                // Torn down mid-probe: discard the result, mutate nothing.
                return self.state.is_connected;
            }
            report = self.prober.probe() => report,
        };

        let now = Instant::now();
        let at = Utc::now();
        if report.healthy {
            self.state.apply_success(now, at);
        } else {
            warn!(
                detail = report.detail.as_deref().unwrap_or("unknown"),
                retry_count = self.state.retry_count,
                "orchestrator probe failed"
            );
            self.state.apply_failure(report.detail, now, at);
        }
        self.publish();
        self.state.is_connected
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.snapshot());
    }
}
