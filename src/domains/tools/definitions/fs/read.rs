//! Read file tool definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use super::common::{absolute, format_time};
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError, ToolResult};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the read file tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FsReadFileParams {
    /// Absolute path to the file.
    pub path: String,
}

// ============================================================================
// Output Structure
// ============================================================================

#[derive(Debug, Serialize)]
struct ReadResult {
    path: String,
    content: String,
    size: u64,
    modified: Option<String>,
    /// Absent on filesystems that do not record birth time.
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Read file tool - returns UTF-8 content plus size and timestamps.
pub struct FsReadFileTool;

impl ToolDefinition for FsReadFileTool {
    const NAME: &'static str = "filesystem_read_file";
    const DESCRIPTION: &'static str = "Read the contents of a UTF-8 text file. Returns the content with its size and modification/creation times.";
    type Params = FsReadFileParams;

    #[instrument(skip_all, fields(path = %params.path))]
    async fn execute(params: FsReadFileParams, _ctx: &ToolContext) -> ToolResult<Value> {
        info!("Read file tool called");
        let path = absolute(&params.path)?;

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ToolError::not_found(format!("File not found: {}", params.path)));
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Err(ToolError::invalid_input(format!("Not a file: {}", params.path)));
        }

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                ToolError::invalid_input(format!("File is not valid UTF-8: {}", params.path))
            } else {
                e.into()
            }
        })?;

        let result = ReadResult {
            path: path.display().to_string(),
            content,
            size: metadata.len(),
            modified: metadata.modified().ok().map(format_time),
            created: metadata.created().ok().map(format_time),
        };
        Ok(serde_json::to_value(result)?)
    }
}
