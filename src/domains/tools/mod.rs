//! Tools domain module.
//!
//! Tools are the operations MCP clients invoke. Each one is a thin adapter
//! over a single external system and always answers with one JSON text
//! payload: the operation's success shape, or an error envelope.
//!
//! ## Architecture
//!
//! - `definitions/` - adapters and their tool definitions, grouped by backend
//! - `context.rs` - the adapters a tool call runs against
//! - `registry.rs` - central registration and name-based dispatch
//! - `router.rs` - rmcp ToolRouter built from the registry
//! - `envelope.rs` - rendering of tool results into MCP results
//! - `error.rs` - the tool error taxonomy
//!
//! ## Adding a New Tool
//!
//! 1. Implement [`definitions::ToolDefinition`] in the backend's module
//! 2. Register it in `ToolRegistry::register_builtin_tools`
//!
//! The router and both transports pick it up from the registry.

mod context;
pub mod definitions;
pub mod envelope;
mod error;
mod registry;
pub mod router;

pub use context::ToolContext;
pub use definitions::ToolDefinition;
pub use error::{ErrorKind, ToolError, ToolResult};
pub use registry::ToolRegistry;
pub use router::build_tool_router;
