//! Local git tool definitions.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domains::tools::definitions::{NoParams, ToolDefinition};
use crate::domains::tools::{ToolContext, ToolResult};

// ============================================================================
// Tool Parameters
// ============================================================================

fn default_max_count() -> usize {
    10
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Parameters naming one repository.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GitRepoParams {
    /// Repository path relative to the base directory.
    pub repo_path: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GitLogParams {
    /// Repository path relative to the base directory.
    pub repo_path: String,

    /// Maximum number of commits (default 10).
    #[serde(default = "default_max_count")]
    pub max_count: usize,

    /// Branch or revision to walk (default: HEAD).
    #[serde(default)]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GitShowCommitParams {
    /// Repository path relative to the base directory.
    pub repo_path: String,

    /// Commit hash, full or abbreviated.
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GitFileDiffParams {
    /// Repository path relative to the base directory.
    pub repo_path: String,

    /// File path relative to the repository root.
    pub file_path: String,

    /// Branch to compare against (default: HEAD).
    #[serde(default)]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GitCheckoutParams {
    /// Repository path relative to the base directory.
    pub repo_path: String,

    /// Branch, tag or commit to check out.
    pub branch: String,

    /// Create the branch from HEAD if it does not exist.
    #[serde(default)]
    pub create: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GitStageParams {
    /// Repository path relative to the base directory.
    pub repo_path: String,

    /// File to stage. Omit to stage all changes.
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GitCommitParams {
    /// Repository path relative to the base directory.
    pub repo_path: String,

    /// Commit message.
    pub message: String,

    /// Author name (default: repository identity).
    #[serde(default)]
    pub author_name: Option<String>,

    /// Author email (default: repository identity).
    #[serde(default)]
    pub author_email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GitPushParams {
    /// Repository path relative to the base directory.
    pub repo_path: String,

    /// Remote name (default: origin).
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Branch to push (default: current branch).
    #[serde(default)]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GitCloneParams {
    /// URL or path of the repository to clone.
    pub source_url: String,

    /// Destination relative to the base directory.
    pub target_path: String,
}

// ============================================================================
// Tool Definitions
// ============================================================================

pub struct GitListReposTool;

impl ToolDefinition for GitListReposTool {
    const NAME: &'static str = "git_list_repos";
    const DESCRIPTION: &'static str = "List the git repositories directly beneath the configured base directory.";
    type Params = NoParams;

    async fn execute(_params: NoParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.git.list_repos().await
    }
}

pub struct GitListBranchesTool;

impl ToolDefinition for GitListBranchesTool {
    const NAME: &'static str = "git_list_branches";
    const DESCRIPTION: &'static str = "List local and remote-tracking branches of a repository, with the current branch.";
    type Params = GitRepoParams;

    #[instrument(skip_all, fields(repo = %params.repo_path))]
    async fn execute(params: GitRepoParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.git.list_branches(&params.repo_path).await
    }
}

pub struct GitStatusTool;

impl ToolDefinition for GitStatusTool {
    const NAME: &'static str = "git_get_status";
    const DESCRIPTION: &'static str = "Get the working tree status: current branch, dirty flag, and the modified, staged and untracked files.";
    type Params = GitRepoParams;

    #[instrument(skip_all, fields(repo = %params.repo_path))]
    async fn execute(params: GitRepoParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.git.status(&params.repo_path).await
    }
}

pub struct GitLogTool;

impl ToolDefinition for GitLogTool {
    const NAME: &'static str = "git_get_log";
    const DESCRIPTION: &'static str = "Get the commit history of a repository, newest first.";
    type Params = GitLogParams;

    #[instrument(skip_all, fields(repo = %params.repo_path, max_count = params.max_count))]
    async fn execute(params: GitLogParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.git
            .log(&params.repo_path, params.max_count, params.branch)
            .await
    }
}

pub struct GitShowCommitTool;

impl ToolDefinition for GitShowCommitTool {
    const NAME: &'static str = "git_show_commit";
    const DESCRIPTION: &'static str = "Show a commit's metadata and its diff against the first parent.";
    type Params = GitShowCommitParams;

    #[instrument(skip_all, fields(repo = %params.repo_path, sha = %params.sha))]
    async fn execute(params: GitShowCommitParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.git.show_commit(&params.repo_path, &params.sha).await
    }
}

pub struct GitListTagsTool;

impl ToolDefinition for GitListTagsTool {
    const NAME: &'static str = "git_list_tags";
    const DESCRIPTION: &'static str = "List the tags of a repository with the commits they point to.";
    type Params = GitRepoParams;

    #[instrument(skip_all, fields(repo = %params.repo_path))]
    async fn execute(params: GitRepoParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.git.list_tags(&params.repo_path).await
    }
}

pub struct GitFileDiffTool;

impl ToolDefinition for GitFileDiffTool {
    const NAME: &'static str = "git_get_file_diff";
    const DESCRIPTION: &'static str = "Diff one file in the working tree against HEAD or a given branch.";
    type Params = GitFileDiffParams;

    #[instrument(skip_all, fields(repo = %params.repo_path, file = %params.file_path))]
    async fn execute(params: GitFileDiffParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.git
            .file_diff(&params.repo_path, &params.file_path, params.branch)
            .await
    }
}

pub struct GitCurrentBranchTool;

impl ToolDefinition for GitCurrentBranchTool {
    const NAME: &'static str = "git_get_current_branch";
    const DESCRIPTION: &'static str = "Get the checked-out branch of a repository (\"HEAD\" when detached).";
    type Params = GitRepoParams;

    #[instrument(skip_all, fields(repo = %params.repo_path))]
    async fn execute(params: GitRepoParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.git.current_branch(&params.repo_path).await
    }
}

pub struct GitCheckoutTool;

impl ToolDefinition for GitCheckoutTool {
    const NAME: &'static str = "git_checkout_branch";
    const DESCRIPTION: &'static str = "Check out a branch, tag or commit. With create=true a missing branch is created from HEAD.";
    type Params = GitCheckoutParams;

    #[instrument(skip_all, fields(repo = %params.repo_path, branch = %params.branch))]
    async fn execute(params: GitCheckoutParams, ctx: &ToolContext) -> ToolResult<Value> {
        info!("Git checkout tool called");
        ctx.git
            .checkout(&params.repo_path, &params.branch, params.create)
            .await
    }
}

pub struct GitStageTool;

impl ToolDefinition for GitStageTool {
    const NAME: &'static str = "git_stage_file";
    const DESCRIPTION: &'static str =
        "Stage one file, or all changes when no file is given. Reports the added or modified paths.";
    type Params = GitStageParams;

    #[instrument(skip_all, fields(repo = %params.repo_path))]
    async fn execute(params: GitStageParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.git.stage(&params.repo_path, params.file_path).await
    }
}

pub struct GitCommitTool;

impl ToolDefinition for GitCommitTool {
    const NAME: &'static str = "git_commit";
    const DESCRIPTION: &'static str = "Commit the staged changes. Author defaults to the repository's configured identity.";
    type Params = GitCommitParams;

    #[instrument(skip_all, fields(repo = %params.repo_path))]
    async fn execute(params: GitCommitParams, ctx: &ToolContext) -> ToolResult<Value> {
        info!("Git commit tool called");
        ctx.git
            .commit(
                &params.repo_path,
                &params.message,
                params.author_name,
                params.author_email,
            )
            .await
    }
}

pub struct GitPullTool;

impl ToolDefinition for GitPullTool {
    const NAME: &'static str = "git_pull";
    const DESCRIPTION: &'static str = "Fast-forward the current branch from origin and report how many commits arrived.";
    type Params = GitRepoParams;

    #[instrument(skip_all, fields(repo = %params.repo_path))]
    async fn execute(params: GitRepoParams, ctx: &ToolContext) -> ToolResult<Value> {
        info!("Git pull tool called");
        ctx.git.pull(&params.repo_path).await
    }
}

pub struct GitPushTool;

impl ToolDefinition for GitPushTool {
    const NAME: &'static str = "git_push";
    const DESCRIPTION: &'static str = "Push a branch (default: the current one) to a remote (default: origin).";
    type Params = GitPushParams;

    #[instrument(skip_all, fields(repo = %params.repo_path, remote = %params.remote))]
    async fn execute(params: GitPushParams, ctx: &ToolContext) -> ToolResult<Value> {
        info!("Git push tool called");
        ctx.git
            .push(&params.repo_path, &params.remote, params.branch)
            .await
    }
}

pub struct GitRemoteTool;

impl ToolDefinition for GitRemoteTool {
    const NAME: &'static str = "git_get_remote";
    const DESCRIPTION: &'static str = "List the configured remotes with their fetch and push URLs.";
    type Params = GitRepoParams;

    #[instrument(skip_all, fields(repo = %params.repo_path))]
    async fn execute(params: GitRepoParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.git.remotes(&params.repo_path).await
    }
}

pub struct GitCloneTool;

impl ToolDefinition for GitCloneTool {
    const NAME: &'static str = "git_clone";
    const DESCRIPTION: &'static str = "Clone a repository into a new directory beneath the base directory.";
    type Params = GitCloneParams;

    #[instrument(skip_all, fields(source = %params.source_url, target = %params.target_path))]
    async fn execute(params: GitCloneParams, ctx: &ToolContext) -> ToolResult<Value> {
        info!("Git clone tool called");
        ctx.git
            .clone_repo(&params.source_url, &params.target_path)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{commit_file, init_repo};
    use super::*;
    use crate::core::config::Config;
    use crate::domains::tools::ErrorKind;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn context(base: &std::path::Path) -> ToolContext {
        let mut config = Config::default();
        config.local_git.base_path = Some(base.to_path_buf());
        ToolContext::new(Arc::new(config))
    }

    #[test]
    fn test_param_defaults() {
        let log: GitLogParams = serde_json::from_value(json!({"repo_path": "p"})).unwrap();
        assert_eq!(log.max_count, 10);
        assert!(log.branch.is_none());

        let push: GitPushParams = serde_json::from_value(json!({"repo_path": "p"})).unwrap();
        assert_eq!(push.remote, "origin");

        let checkout: GitCheckoutParams =
            serde_json::from_value(json!({"repo_path": "p", "branch": "dev"})).unwrap();
        assert!(!checkout.create);
    }

    #[tokio::test]
    async fn test_log_through_context() {
        let base = TempDir::new().unwrap();
        let repo = init_repo(&base.path().join("proj"));
        commit_file(&repo, "a.txt", "a", "first");
        let ctx = context(base.path());

        let params = GitLogParams {
            repo_path: "proj".into(),
            max_count: 10,
            branch: None,
        };
        let result = GitLogTool::execute(params, &ctx).await.unwrap();
        assert_eq!(result["count"], 1);
        assert_eq!(result["commits"][0]["message"], "first");
    }

    #[tokio::test]
    async fn test_unconfigured_base_path() {
        let ctx = ToolContext::new(Arc::new(Config::default()));
        let err = GitListReposTool::execute(NoParams {}, &ctx).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);
        assert_eq!(err.to_string(), "LOCAL_GIT_BASE_PATH not configured");
    }
}
