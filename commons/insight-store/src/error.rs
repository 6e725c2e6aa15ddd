#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Datastore backend error: {0}")]
    Backend(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "rest")]
impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            StoreError::Timeout(error.to_string())
        } else if error.is_connect() {
            StoreError::Connection(error.to_string())
        } else {
            StoreError::Backend(error.to_string())
        }
    }
}
