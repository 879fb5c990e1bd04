//! Universal MCP Server library.
//!
//! Exposes a fixed catalog of Model Context Protocol tools that front
//! existing systems: MySQL and PostgreSQL, MongoDB, the local filesystem,
//! a generic HTTP API, GitHub, and git repositories beneath a sandboxed
//! root. Every tool returns one JSON text payload; failures use the
//! envelope `{"error": message, "kind": kind}`.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, path sandboxing, the server
//!   handler and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: the adapters and their tool definitions
//!   - **resources**: backend status snapshots (`config://...`)
//!   - **prompts**: usage guidance per backend family
//!
//! # Example
//!
//! ```rust,no_run
//! use universal_mcp_server::{core::Config, core::McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
