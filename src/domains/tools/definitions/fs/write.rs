//! Write file tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::common::absolute;
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolResult};

/// Parameters for the write file tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FsWriteFileParams {
    /// Absolute path to the file.
    pub path: String,

    /// Content to write.
    pub content: String,
}

/// Write file tool - creates or overwrites a file, creating parent directories.
pub struct FsWriteFileTool;

impl ToolDefinition for FsWriteFileTool {
    const NAME: &'static str = "filesystem_write_file";
    const DESCRIPTION: &'static str = "Write content to a file, creating it (and any missing parent directories) or overwriting it.";
    type Params = FsWriteFileParams;

    #[instrument(skip_all, fields(path = %params.path, bytes = params.content.len()))]
    async fn execute(params: FsWriteFileParams, _ctx: &ToolContext) -> ToolResult<Value> {
        info!("Write file tool called");
        let path = absolute(&params.path)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, params.content.as_bytes()).await?;

        Ok(json!({
            "success": true,
            "path": path.display().to_string(),
            "bytes_written": params.content.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_overwrite_counts_utf8_bytes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("note.txt");
        std::fs::write(&path, "a much longer previous content").unwrap();
        let ctx = ToolContext::new(Arc::new(Config::default()));

        let result = FsWriteFileTool::execute(
            FsWriteFileParams {
                path: path.to_string_lossy().into_owned(),
                content: "héllo".to_string(),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(result["bytes_written"], 6);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "héllo");
    }
}
