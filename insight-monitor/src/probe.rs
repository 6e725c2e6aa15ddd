use async_trait::async_trait;

/// Result of a single bounded-latency health check.
///
/// Probes never error: every failure path folds into `healthy: false` with a
/// human-readable detail, so callers need no error handling of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub healthy: bool,
    pub detail: Option<String>,
}

impl ProbeReport {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            detail: None,
        }
    }

    pub fn unhealthy(detail: impl Into<String>) -> Self {
        Self {
            healthy: false,
            detail: Some(detail.into()),
        }
    }
}

/// Classified transport failure, checked in priority order by implementors:
/// connection refused, then timeout, then generic network failure, then the
/// underlying message as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureKind {
    Refused,
    Timeout,
    Network,
    Other(String),
}

impl FailureKind {
    pub fn detail(&self) -> String {
        match self {
            FailureKind::Refused => {
                "Orchestrator service not running".to_string()
            }
            FailureKind::Timeout => "Connection timeout".to_string(),
            FailureKind::Network => "Network error".to_string(),
            FailureKind::Other(message) => message.clone(),
        }
    }
}

impl From<FailureKind> for ProbeReport {
    fn from(kind: FailureKind) -> Self {
        ProbeReport::unhealthy(kind.detail())
    }
}

/// A single health check against the orchestrator.
///
/// Implementations must apply their own hard timeout (~5 s) and classify it
/// as `FailureKind::Timeout` rather than letting the call hang or error.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self) -> ProbeReport;
}
