//! # Coolify Client
//!
//! HTTP client for the Coolify platform API, used by the MCP server to
//! translate tool invocations into REST calls.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coolify_client::{ApiTransport, ClientConfig, ClientResult, HttpTransport, Method};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> ClientResult<()> {
//!     // Configuration from COOLIFY_BASE_URL / COOLIFY_API_TOKEN
//!     let config = Arc::new(ClientConfig::from_env()?);
//!     let transport = HttpTransport::new(config)?;
//!
//!     let version = transport.send(Method::Get, "/version", None).await?;
//!     println!("Coolify version: {}", version);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod transport;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ErrorResponse};
pub use transport::{ApiTransport, HttpTransport, Method};
