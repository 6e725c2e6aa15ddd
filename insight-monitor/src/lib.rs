//! Connection-health core for the Insight dashboard backend.
//!
//! Owns the state machine that decides whether the service is allowed to
//! call the workflow orchestrator: probe classification, per-operation
//! rate-limit gates, and the progressive-backoff retry schedule. Framework
//! agnostic; the gateway crate wires in an HTTP prober and exposes the
//! snapshots over its API.

pub mod gate;
pub mod monitor;
pub mod probe;
pub mod state;

pub use gate::RateLimitGate;
pub use monitor::{ConnectionMonitor, MonitorConfig};
pub use probe::{FailureKind, HealthProbe, ProbeReport};
pub use state::{
    ConnectionSnapshot, ConnectionState, MAX_RETRIES, Phase, RETRY_INTERVALS,
    backoff_delay,
};
