// MCP (Model Context Protocol) server for Coolify
// Translates tool calls from agent clients (Claude Code, etc.) into
// Coolify REST API requests.

pub mod catalog;
pub mod dispatch;
pub mod protocol;
pub mod server;

pub use catalog::Catalog;
pub use dispatch::{Dispatcher, ErrorKind, InvocationResult};
pub use server::McpServer;
