//! GitHub REST API client.
//!
//! Responses are deserialized into narrow structs and reshaped into the
//! tool result objects. Timestamps are normalized to RFC 3339.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{error, info, instrument, warn};

use crate::core::config::GithubConfig;
use crate::domains::tools::{ToolError, ToolResult};

const API_VERSION: &str = "2022-11-28";
const MAX_PER_PAGE: usize = 100;
const PULLS_LIMIT: usize = 20;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// API payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct Label {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Issue {
    number: u64,
    title: String,
    state: String,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<Label>,
    #[serde(default)]
    comments: u64,
    created_at: Option<String>,
    updated_at: Option<String>,
    html_url: String,
}

impl Issue {
    fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.name.as_str()).collect()
    }

    fn summary(&self) -> Value {
        json!({
            "number": self.number,
            "title": self.title,
            "state": self.state,
            "body": self.body,
            "labels": self.label_names(),
            "created_at": normalize_time(self.created_at.as_deref()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    #[serde(rename = "ref")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Pull {
    number: u64,
    title: String,
    state: String,
    body: Option<String>,
    head: BranchRef,
    base: BranchRef,
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileContent {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    content: Option<String>,
    encoding: Option<String>,
    size: u64,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

fn normalize_time(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    Some(
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc).to_rfc3339())
            .unwrap_or_else(|_| raw.to_string()),
    )
}

fn check_state(state: &str) -> ToolResult<()> {
    match state {
        "open" | "closed" | "all" => Ok(()),
        other => Err(ToolError::invalid_input(format!(
            "state must be 'open', 'closed' or 'all', got '{}'",
            other
        ))),
    }
}

// ============================================================================
// Client
// ============================================================================

pub struct GithubAdapter {
    config: GithubConfig,
    /// A builder failure is kept and reported on every call.
    client: Result<reqwest::Client, String>,
}

impl GithubAdapter {
    pub fn new(config: GithubConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("universal-mcp-server/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                error!("Failed to build GitHub HTTP client: {}", e);
                e.to_string()
            });
        Self { config, client }
    }

    fn client(&self) -> ToolResult<&reqwest::Client> {
        self.client
            .as_ref()
            .map_err(|e| ToolError::remote(format!("HTTP client unavailable: {}", e)))
    }

    fn ensure_configured(&self) -> ToolResult<()> {
        if !self.config.is_configured() {
            return Err(ToolError::configuration_missing("GITHUB_TOKEN not configured"));
        }
        if self.config.owner.is_empty() || self.config.repo.is_empty() {
            return Err(ToolError::configuration_missing(
                "GITHUB_OWNER and GITHUB_REPO must be set",
            ));
        }
        Ok(())
    }

    /// `{api_url}/repos/{owner}/{repo}/{segments...}`, each segment escaped.
    fn repo_url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> ToolResult<Url> {
        let mut url = Url::parse(&self.config.api_url).map_err(|e| {
            ToolError::configuration_missing(format!("Invalid GITHUB_API_URL: {}", e))
        })?;
        url.path_segments_mut()
            .map_err(|_| ToolError::configuration_missing("GITHUB_API_URL cannot be a base URL"))?
            .pop_if_empty()
            .extend(["repos", self.config.owner.as_str(), self.config.repo.as_str()])
            .extend(segments);
        Ok(url)
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        if let Ok(mut value) = HeaderValue::from_str(&format!("Bearer {}", self.config.token)) {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ToolResult<T> {
        let response = request.headers(self.headers()).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiMessage>(&text)
                .map(|m| m.message)
                .unwrap_or(text);
            warn!("GitHub API returned {}: {}", status, message);
            return Err(match status {
                StatusCode::NOT_FOUND => {
                    ToolError::not_found(format!("GitHub resource not found: {}", message))
                }
                StatusCode::UNPROCESSABLE_ENTITY => {
                    ToolError::invalid_input(format!("GitHub rejected the request: {}", message))
                }
                _ => ToolError::remote(format!("GitHub API returned {}: {}", status, message)),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            ToolError::remote(format!("Unexpected GitHub response: {}", e))
        })
    }

    /// Page through issues until `limit` are collected or the pages run out.
    #[instrument(skip(self))]
    pub async fn list_issues(&self, state: &str, limit: usize) -> ToolResult<Value> {
        self.ensure_configured()?;
        check_state(state)?;

        let per_page = limit.clamp(1, MAX_PER_PAGE);
        let url = self.repo_url(["issues"])?;
        let mut issues: Vec<Issue> = Vec::new();
        let mut page = 1;

        while issues.len() < limit {
            let request = self.client()?.get(url.clone()).query(&[
                ("state", state.to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ]);
            let batch: Vec<Issue> = self.send(request).await?;
            let exhausted = batch.len() < per_page;
            issues.extend(batch);
            if exhausted {
                break;
            }
            page += 1;
        }
        issues.truncate(limit);

        info!("Fetched {} issue(s)", issues.len());
        let issues: Vec<Value> = issues.iter().map(Issue::summary).collect();
        Ok(json!({
            "count": issues.len(),
            "issues": issues,
        }))
    }

    #[instrument(skip(self))]
    pub async fn get_issue(&self, number: u64) -> ToolResult<Value> {
        self.ensure_configured()?;

        let url = self.repo_url(["issues", number.to_string().as_str()])?;
        let issue: Issue = self.send(self.client()?.get(url)).await?;

        Ok(json!({
            "number": issue.number,
            "title": issue.title,
            "state": issue.state,
            "body": issue.body,
            "labels": issue.label_names(),
            "comments": issue.comments,
            "created_at": normalize_time(issue.created_at.as_deref()),
            "updated_at": normalize_time(issue.updated_at.as_deref()),
        }))
    }

    #[instrument(skip(self, body))]
    pub async fn create_issue(&self, title: &str, body: &str, labels: &[String]) -> ToolResult<Value> {
        self.ensure_configured()?;
        if title.trim().is_empty() {
            return Err(ToolError::invalid_input("title must not be empty"));
        }

        let url = self.repo_url(["issues"])?;
        let payload = json!({"title": title, "body": body, "labels": labels});
        let issue: Issue = self.send(self.client()?.post(url).json(&payload)).await?;

        info!("Created issue #{}", issue.number);
        Ok(json!({
            "number": issue.number,
            "title": issue.title,
            "state": issue.state,
            "url": issue.html_url,
        }))
    }

    #[instrument(skip(self))]
    pub async fn list_pulls(&self, state: &str) -> ToolResult<Value> {
        self.ensure_configured()?;
        check_state(state)?;

        let request = self.client()?.get(self.repo_url(["pulls"])?).query(&[
            ("state", state.to_string()),
            ("per_page", PULLS_LIMIT.to_string()),
        ]);
        let pulls: Vec<Pull> = self.send(request).await?;

        let pulls: Vec<Value> = pulls
            .iter()
            .take(PULLS_LIMIT)
            .map(|pr| {
                json!({
                    "number": pr.number,
                    "title": pr.title,
                    "state": pr.state,
                    "body": pr.body,
                    "head_branch": pr.head.name,
                    "base_branch": pr.base.name,
                    "created_at": normalize_time(pr.created_at.as_deref()),
                })
            })
            .collect();
        Ok(json!({
            "count": pulls.len(),
            "pulls": pulls,
        }))
    }

    /// File metadata and content, still base64-encoded as GitHub returns it.
    #[instrument(skip(self))]
    pub async fn get_file_content(&self, path: &str, git_ref: &str) -> ToolResult<Value> {
        self.ensure_configured()?;
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(ToolError::invalid_input("path must not be empty"));
        }

        let url = self.repo_url(std::iter::once("contents").chain(segments))?;
        let request = self.client()?.get(url).query(&[("ref", git_ref)]);
        let value: Value = self.send(request).await?;
        if value.is_array() {
            return Err(ToolError::invalid_input(format!("Not a file: {} is a directory", path)));
        }
        let file: FileContent = serde_json::from_value(value)
            .map_err(|e| ToolError::remote(format!("Unexpected GitHub response: {}", e)))?;
        if file.kind != "file" {
            return Err(ToolError::invalid_input(format!("Not a file: {} is a {}", path, file.kind)));
        }

        Ok(json!({
            "name": file.name,
            "path": file.path,
            "content": file.content,
            "encoding": file.encoding,
            "size": file.size,
            "sha": file.sha,
        }))
    }
}
