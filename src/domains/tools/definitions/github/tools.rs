//! GitHub tool definitions.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domains::tools::definitions::ToolDefinition;
use crate::domains::tools::{ToolContext, ToolResult};

// ============================================================================
// Tool Parameters
// ============================================================================

fn default_state() -> String {
    "open".to_string()
}

fn default_issue_limit() -> usize {
    10
}

fn default_ref() -> String {
    "main".to_string()
}

/// Parameters for listing issues.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListIssuesParams {
    /// Issue state filter: `open`, `closed` or `all`.
    #[serde(default = "default_state")]
    pub state: String,

    /// Maximum number of issues to return (default 10).
    #[serde(default = "default_issue_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetIssueParams {
    /// The issue number to retrieve.
    pub issue_number: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateIssueParams {
    /// Issue title.
    pub title: String,

    /// Issue description body.
    #[serde(default)]
    pub body: String,

    /// Label names to add.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListPullsParams {
    /// Pull request state filter: `open`, `closed` or `all`.
    #[serde(default = "default_state")]
    pub state: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetFileContentParams {
    /// File path in the repository, e.g. `src/main.rs`.
    pub path: String,

    /// Branch, tag or commit SHA (default `main`).
    #[serde(default = "default_ref", rename = "ref")]
    pub git_ref: String,
}

// ============================================================================
// Tool Definitions
// ============================================================================

pub struct GithubListIssuesTool;

impl ToolDefinition for GithubListIssuesTool {
    const NAME: &'static str = "github_list_issues";
    const DESCRIPTION: &'static str = "List issues in the configured GitHub repository, filtered by state. Returns number, title, state, body, labels and creation time.";
    type Params = ListIssuesParams;

    #[instrument(skip_all, fields(state = %params.state, limit = params.limit))]
    async fn execute(params: ListIssuesParams, ctx: &ToolContext) -> ToolResult<Value> {
        info!("GitHub list issues tool called");
        ctx.github.list_issues(&params.state, params.limit).await
    }
}

pub struct GithubGetIssueTool;

impl ToolDefinition for GithubGetIssueTool {
    const NAME: &'static str = "github_get_issue";
    const DESCRIPTION: &'static str = "Get one issue of the configured GitHub repository by number, including comment count and update time.";
    type Params = GetIssueParams;

    async fn execute(params: GetIssueParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.github.get_issue(params.issue_number).await
    }
}

pub struct GithubCreateIssueTool;

impl ToolDefinition for GithubCreateIssueTool {
    const NAME: &'static str = "github_create_issue";
    const DESCRIPTION: &'static str = "Create an issue in the configured GitHub repository with an optional body and labels.";
    type Params = CreateIssueParams;

    #[instrument(skip_all, fields(title = %params.title))]
    async fn execute(params: CreateIssueParams, ctx: &ToolContext) -> ToolResult<Value> {
        info!("GitHub create issue tool called");
        let labels = params.labels.unwrap_or_default();
        ctx.github
            .create_issue(&params.title, &params.body, &labels)
            .await
    }
}

pub struct GithubListPullsTool;

impl ToolDefinition for GithubListPullsTool {
    const NAME: &'static str = "github_list_pulls";
    const DESCRIPTION: &'static str = "List up to 20 pull requests in the configured GitHub repository, filtered by state.";
    type Params = ListPullsParams;

    async fn execute(params: ListPullsParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.github.list_pulls(&params.state).await
    }
}

pub struct GithubGetFileContentTool;

impl ToolDefinition for GithubGetFileContentTool {
    const NAME: &'static str = "github_get_file_content";
    const DESCRIPTION: &'static str = "Fetch a file from the configured GitHub repository at a branch, tag or commit. The content is returned base64-encoded.";
    type Params = GetFileContentParams;

    #[instrument(skip_all, fields(path = %params.path, git_ref = %params.git_ref))]
    async fn execute(params: GetFileContentParams, ctx: &ToolContext) -> ToolResult<Value> {
        ctx.github
            .get_file_content(&params.path, &params.git_ref)
            .await
    }
}
