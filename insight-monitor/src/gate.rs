use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Cooldown gate deduplicating redundant calls to a guarded operation.
///
/// One instance per operation (health check, executions list, dashboard
/// refresh); multiple components share it through an `Arc`. The gate is an
/// explicit injectable object rather than a module-level static so tests can
/// construct and reset their own instances.
#[derive(Debug)]
pub struct RateLimitGate {
    cooldown: Duration,
    last_attempt: Mutex<Option<Instant>>,
}

impl RateLimitGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_attempt: Mutex::new(None),
        }
    }

    /// Test-and-set: returns false with no side effect while the cooldown
    /// since the last recorded attempt has not elapsed, otherwise records
    /// this attempt and returns true.
    pub fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut last = self.last_attempt.lock().expect("gate mutex poisoned");
        if let Some(previous) = *last {
            if now.duration_since(previous) < self.cooldown {
                return false;
            }
        }
        *last = Some(now);
        true
    }

    /// Record an attempt unconditionally. Used by callers that are already
    /// spaced out by another mechanism (the monitor's backoff schedule) so
    /// that gated callers still observe their traffic.
    pub fn stamp(&self) {
        let mut last = self.last_attempt.lock().expect("gate mutex poisoned");
        *last = Some(Instant::now());
    }

    /// Clear the gate, as if no attempt was ever made.
    pub fn reset(&self) {
        let mut last = self.last_attempt.lock().expect("gate mutex poisoned");
        *last = None;
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}
