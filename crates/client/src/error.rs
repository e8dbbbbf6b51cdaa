//! Error types for the Coolify client.

use serde::{Deserialize, Serialize};

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Error types that can occur when talking to the Coolify API.
///
/// `Api` is the transport-classified tier: the upstream responded with a
/// failure status and the caller gets a structured result. Every other
/// variant (unreachable host, body decode, bad configuration) propagates
/// unclassified so the hosting layer reports it as its own fault.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed before a response was produced.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Create an API error from a status code and response body.
    ///
    /// Prefers the upstream's own `message` field; bodies without one get
    /// a generic status description.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|response| response.message)
            .unwrap_or_else(|| format!("request failed with status {}", status));

        Self::Api { status, message }
    }
}

/// Error response body from the Coolify API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
