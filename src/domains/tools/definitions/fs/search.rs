//! Recursive file search by glob pattern.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::common::{absolute, entry_type, file_name, glob_in};
use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolError, ToolResult};

fn default_max_results() -> usize {
    20
}

/// Parameters for the search tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FsSearchParams {
    /// Root directory to search.
    pub directory: String,

    /// Glob pattern relative to the directory, e.g. `*.py` or `**/*.js`.
    pub pattern: String,

    /// Maximum number of results (default 20).
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

pub struct FsSearchTool;

impl ToolDefinition for FsSearchTool {
    const NAME: &'static str = "filesystem_search";
    const DESCRIPTION: &'static str = "Search for files and directories matching a glob pattern (use `**` to recurse). Results are capped at max_results.";
    type Params = FsSearchParams;

    #[instrument(skip_all, fields(directory = %params.directory, pattern = %params.pattern))]
    async fn execute(params: FsSearchParams, _ctx: &ToolContext) -> ToolResult<Value> {
        info!("Search tool called");
        let dir = absolute(&params.directory)?;
        if !dir.is_dir() {
            return Err(ToolError::not_found(format!(
                "Directory not found: {}",
                params.directory
            )));
        }

        let pattern = params.pattern.clone();
        let max_results = params.max_results;
        let (dir, matches) = tokio::task::spawn_blocking(move || {
            let matches: Vec<Value> = glob_in(&dir, &pattern, max_results)?
                .iter()
                .map(|p| {
                    json!({
                        "name": file_name(p),
                        "path": p.display().to_string(),
                        "type": entry_type(p),
                    })
                })
                .collect();
            Ok::<_, ToolError>((dir, matches))
        })
        .await??;

        Ok(json!({
            "directory": dir.display().to_string(),
            "pattern": params.pattern,
            "count": matches.len(),
            "matches": matches,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::domains::tools::ErrorKind;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn ctx() -> ToolContext {
        ToolContext::new(Arc::new(Config::default()))
    }

    #[tokio::test]
    async fn test_recursive_search_respects_cap() {
        let temp = TempDir::new().unwrap();
        for dir in ["a", "a/b", "c"] {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        for file in ["top.rs", "a/one.rs", "a/b/two.rs", "c/three.rs", "c/notes.md"] {
            fs::write(temp.path().join(file), "").unwrap();
        }

        let params = FsSearchParams {
            directory: temp.path().to_string_lossy().into_owned(),
            pattern: "**/*.rs".to_string(),
            max_results: 20,
        };
        let result = FsSearchTool::execute(params.clone(), &ctx()).await.unwrap();
        assert_eq!(result["count"], 4);
        assert_eq!(result["pattern"], "**/*.rs");
        assert!(
            result["matches"]
                .as_array()
                .unwrap()
                .iter()
                .all(|m| m["type"] == "file")
        );

        let capped = FsSearchTool::execute(
            FsSearchParams {
                max_results: 2,
                ..params
            },
            &ctx(),
        )
        .await
        .unwrap();
        assert_eq!(capped["count"], 2);
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let temp = TempDir::new().unwrap();
        let params = FsSearchParams {
            directory: temp.path().join("void").to_string_lossy().into_owned(),
            pattern: "*".to_string(),
            max_results: 20,
        };
        let err = FsSearchTool::execute(params, &ctx()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
