use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Progressive backoff schedule, indexed by retry attempt (1-based).
pub const RETRY_INTERVALS: [Duration; 4] = [
    Duration::from_secs(5),
    Duration::from_secs(10),
    Duration::from_secs(30),
    Duration::from_secs(60),
];

/// Automatic retries stop after this many consecutive failures; only a
/// manual re-check resumes probing.
pub const MAX_RETRIES: u32 = 4;

/// Delay before the given retry attempt (1-based). Attempts beyond the
/// schedule hold at the last interval; only reachable if the ceiling is
/// raised above the schedule length.
pub fn backoff_delay(attempt: u32) -> Duration {
    let index = (attempt.max(1) as usize - 1).min(RETRY_INTERVALS.len() - 1);
    RETRY_INTERVALS[index]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Unchecked,
    Checking,
    Connected,
    Disconnected,
}

/// Mutable connection state, owned exclusively by the monitor's driver task.
#[derive(Debug, Clone)]
pub struct ConnectionState {
    pub phase: Phase,
    pub is_connected: bool,
    pub is_checking: bool,
    pub last_checked: Option<Instant>,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub retry_count: u32,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Unchecked,
            is_connected: false,
            is_checking: false,
            last_checked: None,
            last_checked_at: None,
            error: None,
            retry_count: 0,
        }
    }

    pub fn begin_check(&mut self) {
        self.phase = Phase::Checking;
        self.is_checking = true;
    }

    pub fn apply_success(&mut self, now: Instant, at: DateTime<Utc>) {
        self.phase = Phase::Connected;
        self.is_connected = true;
        self.is_checking = false;
        self.last_checked = Some(now);
        self.last_checked_at = Some(at);
        self.error = None;
        self.retry_count = 0;
    }

    pub fn apply_failure(
        &mut self,
        detail: Option<String>,
        now: Instant,
        at: DateTime<Utc>,
    ) {
        self.phase = Phase::Disconnected;
        self.is_connected = false;
        self.is_checking = false;
        self.last_checked = Some(now);
        self.last_checked_at = Some(at);
        self.error =
            Some(detail.unwrap_or_else(|| "Connection failed".to_string()));
    }

    pub fn can_make_api_calls(&self) -> bool {
        self.is_connected
    }

    pub fn should_show_offline_message(&self) -> bool {
        !self.is_connected && self.last_checked.is_some()
    }

    /// True when a failure-driven retry may still be scheduled.
    pub fn retry_eligible(&self, max_retries: u32) -> bool {
        !self.is_connected
            && !self.is_checking
            && self.last_checked.is_some()
            && self.retry_count < max_retries
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        ConnectionSnapshot {
            phase: self.phase,
            is_connected: self.is_connected,
            is_checking: self.is_checking,
            last_checked: self.last_checked_at,
            error: self.error.clone(),
            retry_count: self.retry_count,
            can_make_api_calls: self.can_make_api_calls(),
            should_show_offline_message: self.should_show_offline_message(),
        }
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view handed to consumers; derived flags are computed once here
/// and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSnapshot {
    pub phase: Phase,
    pub is_connected: bool,
    pub is_checking: bool,
    pub last_checked: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub retry_count: u32,
    pub can_make_api_calls: bool,
    pub should_show_offline_message: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_schedule_is_progressive() {
        assert_eq!(backoff_delay(1), Duration::from_secs(5));
        assert_eq!(backoff_delay(2), Duration::from_secs(10));
        assert_eq!(backoff_delay(3), Duration::from_secs(30));
        assert_eq!(backoff_delay(4), Duration::from_secs(60));
        // Beyond the schedule: hold at the last interval.
        assert_eq!(backoff_delay(5), Duration::from_secs(60));
        assert_eq!(backoff_delay(12), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn success_resets_failure_bookkeeping() {
        let mut state = ConnectionState::new();
        state.retry_count = 3;
        state.error = Some("Connection timeout".to_string());

        state.begin_check();
        assert!(state.is_checking);
        assert_eq!(state.phase, Phase::Checking);

        state.apply_success(Instant::now(), Utc::now());
        assert!(state.is_connected);
        assert!(!state.is_checking);
        assert_eq!(state.retry_count, 0);
        assert!(state.error.is_none());
        assert!(state.can_make_api_calls());
        assert!(!state.should_show_offline_message());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_retry_count_and_records_error() {
        let mut state = ConnectionState::new();
        state.retry_count = 2;

        state.begin_check();
        state.apply_failure(
            Some("Network error".to_string()),
            Instant::now(),
            Utc::now(),
        );

        assert!(!state.is_connected);
        assert_eq!(state.retry_count, 2);
        assert_eq!(state.error.as_deref(), Some("Network error"));
        assert!(state.should_show_offline_message());
    }

    #[test]
    fn offline_message_suppressed_before_first_probe() {
        let state = ConnectionState::new();
        assert!(!state.is_connected);
        assert!(!state.should_show_offline_message());
    }

    #[tokio::test(start_paused = true)]
    async fn retry_eligibility_honors_ceiling() {
        let mut state = ConnectionState::new();
        // Never checked: nothing to retry yet.
        assert!(!state.retry_eligible(MAX_RETRIES));

        state.begin_check();
        state.apply_failure(None, Instant::now(), Utc::now());
        assert!(state.retry_eligible(MAX_RETRIES));

        state.retry_count = MAX_RETRIES;
        assert!(!state.retry_eligible(MAX_RETRIES));
    }
}
