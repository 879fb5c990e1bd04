//! Delete tool definition.
//!
//! A tool that deletes a single file. Directories are refused.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::common::absolute;
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError, ToolResult};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the delete tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FsDeleteParams {
    /// Absolute path to the file to delete.
    pub path: String,
}

// ============================================================================
// Output Structure (JSON format for AI agents)
// ============================================================================

/// Result of a delete operation
#[derive(Debug, Serialize)]
struct DeleteResult {
    /// Whether the operation succeeded
    success: bool,
    /// Path that was deleted
    path: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Delete tool - deletes one file.
pub struct FsDeleteTool;

impl ToolDefinition for FsDeleteTool {
    const NAME: &'static str = "filesystem_delete_file";
    const DESCRIPTION: &'static str = "Delete a file. Directories are not deleted.";
    type Params = FsDeleteParams;

    #[instrument(skip_all, fields(path = %params.path))]
    async fn execute(params: FsDeleteParams, _ctx: &ToolContext) -> ToolResult<Value> {
        info!("Delete tool called");
        let path = absolute(&params.path)?;

        // symlink_metadata so a link is removed rather than followed
        let metadata = match tokio::fs::symlink_metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ToolError::not_found(format!("File not found: {}", params.path)));
            }
            Err(e) => return Err(e.into()),
        };
        if metadata.is_dir() {
            warn!("Refusing to delete a directory");
            return Err(ToolError::invalid_input(format!(
                "Not a file: {} is a directory",
                params.path
            )));
        }

        tokio::fs::remove_file(&path).await?;

        let result = DeleteResult {
            success: true,
            path: path.display().to_string(),
        };
        Ok(serde_json::to_value(result)?)
    }
}
