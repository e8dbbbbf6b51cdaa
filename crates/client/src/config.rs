//! Configuration types for the Coolify client.

use crate::error::{ClientError, ClientResult};
use std::time::Duration;
use url::Url;

/// Environment variable holding the Coolify instance URL.
pub const ENV_BASE_URL: &str = "COOLIFY_BASE_URL";

/// Environment variable holding the Coolify API token.
pub const ENV_API_TOKEN: &str = "COOLIFY_API_TOKEN";

/// Configuration for the Coolify client.
///
/// Established once at startup and never rotated; every request shares the
/// transport built from it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Coolify instance (without the `/api/v1` suffix).
    pub base_url: Url,
    /// Bearer token for authentication.
    pub api_token: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL and token.
    pub fn new(base_url: Url, api_token: impl Into<String>) -> Self {
        Self {
            base_url,
            api_token: api_token.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Load configuration from `COOLIFY_BASE_URL` and `COOLIFY_API_TOKEN`.
    ///
    /// Both settings are required; a missing one is a startup failure and
    /// the process must refuse to serve invocations.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_settings(
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_API_TOKEN).ok(),
        )
    }

    /// Build configuration from optional raw settings.
    pub fn from_settings(
        base_url: Option<String>,
        api_token: Option<String>,
    ) -> ClientResult<Self> {
        let base_url = base_url
            .ok_or_else(|| ClientError::Config(format!("{} is not set", ENV_BASE_URL)))?;
        let api_token = api_token
            .ok_or_else(|| ClientError::Config(format!("{} is not set", ENV_API_TOKEN)))?;

        let base_url = Url::parse(&base_url)?;

        Ok(Self::new(base_url, api_token))
    }
}
