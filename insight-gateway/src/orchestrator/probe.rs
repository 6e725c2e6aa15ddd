use async_trait::async_trait;
use insight_monitor::{HealthProbe, ProbeReport};
use std::sync::Arc;

use crate::orchestrator::OrchestratorClient;

/// Production prober: one sweep of the orchestrator's health endpoints.
///
/// The client bounds every endpoint attempt with the status timeout, so the
/// probe settles without a timeout of its own and never errors.
pub struct HttpHealthProbe {
    client: Arc<OrchestratorClient>,
}

impl HttpHealthProbe {
    pub fn new(client: Arc<OrchestratorClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn probe(&self) -> ProbeReport {
        let health = self.client.probe_health().await;
        if health.healthy {
            ProbeReport::healthy()
        } else {
            ProbeReport::unhealthy(
                health
                    .error
                    .unwrap_or_else(|| "Connection failed".to_string()),
            )
        }
    }
}
