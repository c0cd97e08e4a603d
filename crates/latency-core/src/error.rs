use thiserror::Error;

/// Why a request to the latency backend did not produce usable data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}
