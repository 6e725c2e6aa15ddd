use insight_monitor::FailureKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Mapped upstream response with a user-facing message.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Request timed out. The orchestrator may be slow to respond.")]
    Timeout,

    #[error("Cannot connect to the orchestrator. Please ensure it is running.")]
    Unreachable,

    #[error("Network error contacting the orchestrator: {0}")]
    Network(String),

    #[error("Orchestrator credentials not configured")]
    MissingCredentials,

    #[error("Invalid response from orchestrator: {0}")]
    InvalidResponse(String),
}

impl OrchestratorError {
    pub fn from_transport(error: reqwest::Error) -> Self {
        match transport_failure(&error) {
            FailureKind::Timeout => OrchestratorError::Timeout,
            FailureKind::Refused => OrchestratorError::Unreachable,
            FailureKind::Network => {
                OrchestratorError::Network(error.to_string())
            }
            FailureKind::Other(message) => OrchestratorError::Network(message),
        }
    }
}

/// Classify a transport error for probe reporting, in priority order:
/// timeout, refused connection, generic network failure, passthrough.
pub fn transport_failure(error: &reqwest::Error) -> FailureKind {
    if error.is_timeout() {
        FailureKind::Timeout
    } else if error.is_connect() {
        FailureKind::Refused
    } else if error.is_request() || error.is_body() || error.is_decode() {
        FailureKind::Network
    } else {
        FailureKind::Other(error.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Upstream status forwarded verbatim with its mapped message.
    #[error("{message}")]
    Upstream { status: u16, message: String },
}

impl From<OrchestratorError> for ApiError {
    fn from(error: OrchestratorError) -> Self {
        match error {
            OrchestratorError::Upstream { status, message } => {
                ApiError::Upstream { status, message }
            }
            OrchestratorError::Timeout => ApiError::Upstream {
                status: 504,
                message: error.to_string(),
            },
            OrchestratorError::Unreachable => {
                ApiError::ServiceUnavailable(error.to_string())
            }
            OrchestratorError::Network(_)
            | OrchestratorError::InvalidResponse(_) => ApiError::Upstream {
                status: 502,
                message: error.to_string(),
            },
            OrchestratorError::MissingCredentials => {
                ApiError::ServiceUnavailable(error.to_string())
            }
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::{Json, http::StatusCode};
        use serde_json::json;

        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
            ApiError::Upstream { status, message } => (
                StatusCode::from_u16(status)
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
