//! Transport layer for the MCP server.
//!
//! - **STDIO** (feature `stdio`, default): rmcp over stdin/stdout.
//! - **HTTP** (feature `http`): JSON-RPC over POST, served by axum.
//!
//! Both hand already-parsed requests to [`McpServer`](crate::core::McpServer);
//! tool dispatch is identical regardless of transport.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
