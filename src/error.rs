use thiserror::Error;

/// Failure of a single backend call.
///
/// None of these are fatal: the provider logs them and the views fall back to
/// their empty / "could not load" rendering.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend answered outside the 2xx range.
    #[error("fetch failed {status}: {url}")]
    Status { status: u16, url: String },

    /// Connection, TLS or timeout failure before a status was received.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Body was not the JSON shape we expected.
    #[error("invalid json from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The shared HTTP client could not be built.
    #[error("http client unavailable: {0}")]
    Client(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ApiError::Status { url, .. }
            | ApiError::Transport { url, .. }
            | ApiError::Decode { url, .. } => Some(url),
            ApiError::Client(_) => None,
        }
    }
}
