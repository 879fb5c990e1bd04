//! Create directory tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::common::absolute;
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError, ToolResult};

/// Parameters for the create directory tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FsCreateDirParams {
    /// Absolute path for the new directory.
    pub path: String,
}

pub struct FsCreateDirTool;

impl ToolDefinition for FsCreateDirTool {
    const NAME: &'static str = "filesystem_create_directory";
    const DESCRIPTION: &'static str = "Create a directory, including any missing parents. Succeeds if it already exists.";
    type Params = FsCreateDirParams;

    #[instrument(skip_all, fields(path = %params.path))]
    async fn execute(params: FsCreateDirParams, _ctx: &ToolContext) -> ToolResult<Value> {
        info!("Create directory tool called");
        let path = absolute(&params.path)?;

        if path.exists() && !path.is_dir() {
            return Err(ToolError::invalid_input(format!(
                "Path exists and is not a directory: {}",
                params.path
            )));
        }
        tokio::fs::create_dir_all(&path).await?;

        Ok(json!({
            "success": true,
            "path": path.display().to_string(),
        }))
    }
}
