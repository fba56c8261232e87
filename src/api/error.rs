use thiserror::Error;

/// Failures talking to the sheet endpoint.
///
/// The UI reports every kind the same way; the split exists for logs
/// and for the save fallback, which only retries on `Network`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("endpoint returned HTTP {0}")]
    Status(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("endpoint rejected the request: {0}")]
    Rejected(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => ApiError::Status(status.as_u16()),
            None if e.is_decode() => ApiError::Decode(e.to_string()),
            None => ApiError::Network(e.to_string()),
        }
    }
}
