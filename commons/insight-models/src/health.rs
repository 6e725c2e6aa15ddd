use serde::{Deserialize, Serialize};

/// Outcome of probing the orchestrator through the fallback endpoint list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrchestratorHealth {
    pub url: String,
    pub healthy: bool,
    /// Endpoint that answered 2xx, when any did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Payload returned by the successful endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Every endpoint tried, in order, with its result.
    #[serde(default)]
    pub attempts: Vec<EndpointAttempt>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointAttempt {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Workflow identity the dashboard displays alongside health.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowEnvironment {
    pub namespace: String,
    pub flow_id: String,
}

/// Response body of the proxied health route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    pub orchestrator: OrchestratorHealth,
    pub environment: WorkflowEnvironment,
}
