//! Tool Registry - central registration and dispatch for all tools.
//!
//! The registry is the single source of truth for the tool catalog. The
//! rmcp router (stdio) and the HTTP transport both dispatch through the
//! handlers stored here, so every transport sees identical behavior.

use std::sync::Arc;

use futures::{FutureExt, future::BoxFuture};
use rmcp::handler::server::tool::schema_for_type;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use serde_json::Value;
use tracing::warn;

use super::context::ToolContext;
use super::definitions::{ToolDefinition, api, fs, git, github, mongo, sql};
use super::envelope::into_call_result;
use super::error::ToolError;

/// A type-erased tool entry point: raw arguments in, rendered result out.
pub(super) type ToolHandler =
    Arc<dyn Fn(JsonObject) -> BoxFuture<'static, CallToolResult> + Send + Sync>;

pub(super) struct RegisteredTool {
    pub(super) tool: Tool,
    pub(super) handler: ToolHandler,
}

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    context: Arc<ToolContext>,
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    /// Create a registry with every built-in tool bound to `context`.
    pub fn new(context: Arc<ToolContext>) -> Self {
        let mut registry = Self {
            context,
            tools: Vec::new(),
        };
        registry.register_builtin_tools();
        registry
    }

    fn register_builtin_tools(&mut self) {
        self.register::<sql::MysqlExecuteQueryTool>();
        self.register::<sql::MysqlListTablesTool>();
        self.register::<sql::MysqlDescribeTableTool>();
        self.register::<sql::PostgresExecuteQueryTool>();
        self.register::<sql::PostgresListTablesTool>();
        self.register::<sql::PostgresDescribeTableTool>();

        self.register::<mongo::MongoListCollectionsTool>();
        self.register::<mongo::MongoFindTool>();
        self.register::<mongo::MongoAggregateTool>();
        self.register::<mongo::MongoCountTool>();

        self.register::<fs::FsReadFileTool>();
        self.register::<fs::FsWriteFileTool>();
        self.register::<fs::FsListDirTool>();
        self.register::<fs::FsCreateDirTool>();
        self.register::<fs::FsDeleteTool>();
        self.register::<fs::FsSearchTool>();

        self.register::<api::ApiGetTool>();
        self.register::<api::ApiPostTool>();
        self.register::<api::ApiPutTool>();
        self.register::<api::ApiDeleteTool>();

        self.register::<github::GithubListIssuesTool>();
        self.register::<github::GithubGetIssueTool>();
        self.register::<github::GithubCreateIssueTool>();
        self.register::<github::GithubListPullsTool>();
        self.register::<github::GithubGetFileContentTool>();

        self.register::<git::GitListReposTool>();
        self.register::<git::GitListBranchesTool>();
        self.register::<git::GitStatusTool>();
        self.register::<git::GitLogTool>();
        self.register::<git::GitShowCommitTool>();
        self.register::<git::GitListTagsTool>();
        self.register::<git::GitFileDiffTool>();
        self.register::<git::GitCurrentBranchTool>();
        self.register::<git::GitCheckoutTool>();
        self.register::<git::GitStageTool>();
        self.register::<git::GitCommitTool>();
        self.register::<git::GitPullTool>();
        self.register::<git::GitPushTool>();
        self.register::<git::GitRemoteTool>();
        self.register::<git::GitCloneTool>();
    }

    /// Register a tool definition.
    ///
    /// Argument deserialization failures are reported through the error
    /// envelope like any other tool failure.
    pub fn register<T: ToolDefinition>(&mut self) {
        let context = self.context.clone();
        let handler: ToolHandler = Arc::new(move |arguments: JsonObject| {
            let context = context.clone();
            async move {
                let result = match serde_json::from_value::<T::Params>(Value::Object(arguments)) {
                    Ok(params) => T::execute(params, &context).await,
                    Err(e) => Err(ToolError::invalid_input(format!(
                        "Invalid arguments for {}: {}",
                        T::NAME,
                        e
                    ))),
                };
                if let Err(e) = &result {
                    warn!(tool = T::NAME, kind = ?e.kind(), "Tool failed: {}", e);
                }
                into_call_result(result)
            }
            .boxed()
        });

        self.tools.push(RegisteredTool {
            tool: to_tool::<T>(),
            handler,
        });
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.tool.name.as_ref()).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.tool.clone()).collect()
    }

    pub(super) fn entries(&self) -> &[RegisteredTool] {
        &self.tools
    }

    /// Dispatch a tool call by name.
    ///
    /// Unknown names and non-object arguments produce an error envelope
    /// rather than a transport-level fault.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> CallToolResult {
        let Some(entry) = self.tools.iter().find(|t| t.tool.name == name) else {
            warn!("Unknown tool requested: {}", name);
            return into_call_result(Err(ToolError::not_found(format!("Unknown tool: {}", name))));
        };

        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => JsonObject::new(),
            _ => {
                return into_call_result(Err(ToolError::invalid_input(
                    "Tool arguments must be a JSON object",
                )));
            }
        };

        (entry.handler)(arguments).await
    }
}

/// Create a Tool model (metadata) for a definition.
fn to_tool<T: ToolDefinition>() -> Tool {
    Tool {
        name: T::NAME.into(),
        description: Some(T::DESCRIPTION.into()),
        input_schema: schema_for_type::<T::Params>().into(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}
