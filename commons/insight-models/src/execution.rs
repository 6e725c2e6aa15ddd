use serde::{Deserialize, Serialize};
use validator::Validate;

/// Execution descriptor as returned by the workflow orchestrator.
///
/// The orchestrator serializes these fields in camelCase; unknown fields are
/// ignored so upstream additions do not break deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionDescriptor {
    pub id: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub flow_id: String,
    pub state: ExecutionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ExecutionState {
    pub current: String,
    #[serde(default)]
    pub histories: Vec<StateHistory>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateHistory {
    pub state: String,
    pub date: String,
}

/// Normalized listing shape for recent runs.
///
/// An empty page with a `message` is a valid non-error state: listing is
/// best-effort and upstream unavailability degrades to it instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ExecutionPage {
    #[serde(default)]
    pub results: Vec<ExecutionDescriptor>,
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExecutionPage {
    pub fn empty_with_message(message: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            message: Some(message.into()),
        }
    }
}

/// Request body accepted by the trigger route.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TriggerRequest {
    #[validate(length(min = 1, message = "data_source_url is required"))]
    pub data_source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_threshold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
}

impl TriggerRequest {
    /// Threshold forwarded to the orchestrator when the caller omits one.
    pub const DEFAULT_DECISION_THRESHOLD: u32 = 75;

    pub fn decision_threshold(&self) -> u32 {
        self.decision_threshold
            .unwrap_or(Self::DEFAULT_DECISION_THRESHOLD)
    }
}
