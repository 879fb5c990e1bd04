//! Tool definitions, grouped by backend.
//!
//! Each backend module holds its adapter (the code that talks to the
//! external system) next to the tool definitions that expose it.

pub mod api;
pub mod fs;
pub mod git;
pub mod github;
pub mod mongo;
pub mod sql;

use std::future::Future;

use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::context::ToolContext;
use super::error::ToolResult;

/// Trait for tool definitions.
///
/// A definition names the tool, describes it for clients, declares its
/// parameters (the JSON schema is derived from them) and runs it against
/// the adapters in a [`ToolContext`].
pub trait ToolDefinition: Send + Sync + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Typed arguments, deserialized from the call's JSON object.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Run the tool. The success value is the tool's JSON result shape.
    fn execute(
        params: Self::Params,
        ctx: &ToolContext,
    ) -> impl Future<Output = ToolResult<Value>> + Send;
}

/// Parameters for tools that take no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}
