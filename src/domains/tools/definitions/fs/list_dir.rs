//! List directory tool definition.
//!
//! A tool that lists the entries of a directory matching a glob pattern.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::common::{EntryInfo, absolute, glob_in};
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError, ToolResult};

// ============================================================================
// Tool Parameters
// ============================================================================

fn default_pattern() -> String {
    "*".to_string()
}

/// Parameters for the list directory tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FsListDirParams {
    /// Absolute path to the directory.
    pub path: String,

    /// Glob pattern for filtering entries (default: `*`, everything).
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// List directory tool - lists files and directories in a given path.
pub struct FsListDirTool;

impl ToolDefinition for FsListDirTool {
    const NAME: &'static str = "filesystem_list_directory";
    const DESCRIPTION: &'static str = "List files and directories in a folder, optionally filtered by a glob pattern. Returns name, path, type, size and modification time for each entry.";
    type Params = FsListDirParams;

    #[instrument(skip_all, fields(path = %params.path, pattern = %params.pattern))]
    async fn execute(params: FsListDirParams, _ctx: &ToolContext) -> ToolResult<Value> {
        info!("List directory tool called");
        let dir = absolute(&params.path)?;

        if !dir.exists() {
            return Err(ToolError::not_found(format!(
                "Directory not found: {}",
                params.path
            )));
        }
        if !dir.is_dir() {
            return Err(ToolError::invalid_input(format!(
                "Not a directory: {}",
                params.path
            )));
        }

        let pattern = params.pattern;
        let (dir, items) = tokio::task::spawn_blocking(move || {
            let items = glob_in(&dir, &pattern, usize::MAX)?
                .iter()
                .map(|p| EntryInfo::stat(p))
                .collect::<ToolResult<Vec<_>>>()?;
            Ok::<_, ToolError>((dir, items))
        })
        .await??;

        Ok(json!({
            "path": dir.display().to_string(),
            "count": items.len(),
            "items": items,
        }))
    }
}
