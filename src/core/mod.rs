//! Core module containing shared infrastructure components.
//!
//! Configuration, error handling, the MCP server handler, path sandboxing
//! and the transport layer live here; backend-specific logic lives under
//! [`crate::domains`].

pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use security::{PathSecurityError, resolve_within};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
