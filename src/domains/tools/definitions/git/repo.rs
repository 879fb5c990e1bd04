//! Repository resolution and helpers shared by the git operations.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, FixedOffset, Utc};
use git2::{Commit, ErrorCode, Oid, Repository};
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use crate::core::config::LocalGitConfig;
use crate::core::security::resolve_within;
use crate::domains::tools::{ToolError, ToolResult};

/// Sandboxed access to the repositories beneath one base directory.
#[derive(Debug, Clone)]
pub struct LocalGitAdapter {
    config: LocalGitConfig,
}

impl LocalGitAdapter {
    pub fn new(config: LocalGitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocalGitConfig {
        &self.config
    }

    /// The canonical base directory.
    pub(super) fn base_path(&self) -> ToolResult<PathBuf> {
        let base = self
            .config
            .base_path
            .as_ref()
            .ok_or_else(|| ToolError::configuration_missing("LOCAL_GIT_BASE_PATH not configured"))?;
        if !base.is_dir() {
            return Err(ToolError::configuration_missing(format!(
                "Base path does not exist: {}",
                base.display()
            )));
        }
        Ok(base.canonicalize()?)
    }

    /// Resolve `repo_path` under the base and check it is a repository.
    pub(super) fn locate(&self, repo_path: &str) -> ToolResult<PathBuf> {
        let base = self.base_path()?;
        let full = resolve_within(&base, repo_path)?;

        if !full.exists() {
            return Err(ToolError::not_found(format!("Repository not found: {}", repo_path)));
        }
        if !full.join(".git").exists() {
            return Err(ToolError::not_found(format!("Not a git repository: {}", repo_path)));
        }
        Ok(full)
    }

    /// Resolve the repository, then run `op` on a blocking thread.
    pub(super) async fn with_repo<T, F>(&self, repo_path: &str, op: F) -> ToolResult<T>
    where
        F: FnOnce(&Path) -> ToolResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let dir = self.locate(repo_path)?;
        tokio::task::spawn_blocking(move || op(&dir)).await?
    }

    /// Immediate subdirectories of the base that contain `.git`, by name.
    pub fn repositories(&self) -> ToolResult<Vec<String>> {
        let base = self.base_path()?;
        let mut names: Vec<String> = std::fs::read_dir(&base)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir() && path.join(".git").exists())
            .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        Ok(names)
    }

    #[instrument(skip(self))]
    pub async fn list_repos(&self) -> ToolResult<Value> {
        let base = self.base_path()?;
        let adapter = self.clone();
        let names = tokio::task::spawn_blocking(move || adapter.repositories()).await??;

        let repositories: Vec<Value> = names
            .iter()
            .map(|name| json!({"name": name, "path": name}))
            .collect();
        Ok(json!({
            "base_path": base.display().to_string(),
            "count": repositories.len(),
            "repositories": repositories,
        }))
    }

    #[instrument(skip(self))]
    pub async fn current_branch(&self, repo_path: &str) -> ToolResult<Value> {
        let label = self
            .with_repo(repo_path, |dir| branch_label(&open(dir)?))
            .await?;
        Ok(json!({"repo": repo_path, "branch": label}))
    }
}

pub(super) fn open(dir: &Path) -> ToolResult<Repository> {
    Ok(Repository::open(dir)?)
}

/// Name of the checked-out branch, `None` when HEAD is detached.
///
/// An unborn branch (fresh repository) still reports its name.
pub(super) fn current_branch(repo: &Repository) -> ToolResult<Option<String>> {
    match repo.head() {
        Ok(head) if head.is_branch() => Ok(head.shorthand().map(str::to_string)),
        Ok(_) => Ok(None),
        Err(e) if e.code() == ErrorCode::UnbornBranch => {
            let head = repo.find_reference("HEAD")?;
            Ok(head
                .symbolic_target()
                .map(|t| t.trim_start_matches("refs/heads/").to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// The current branch name, or `HEAD` when detached.
pub(super) fn branch_label(repo: &Repository) -> ToolResult<String> {
    Ok(current_branch(repo)?.unwrap_or_else(|| "HEAD".to_string()))
}

pub(super) fn short_id(oid: Oid) -> String {
    let mut id = oid.to_string();
    id.truncate(7);
    id
}

pub(super) fn format_git_time(time: git2::Time) -> String {
    let utc = DateTime::<Utc>::from_timestamp(time.seconds(), 0).unwrap_or_default();
    match FixedOffset::east_opt(time.offset_minutes() * 60) {
        Some(offset) => utc.with_timezone(&offset).to_rfc3339(),
        None => utc.to_rfc3339(),
    }
}

/// Commit metadata as reported by log and show.
pub(super) fn commit_info(commit: &Commit<'_>) -> Value {
    let author = commit.author();
    json!({
        "sha": short_id(commit.id()),
        "full_sha": commit.id().to_string(),
        "message": String::from_utf8_lossy(commit.message_bytes()).trim(),
        "author": String::from_utf8_lossy(author.name_bytes()),
        "author_email": String::from_utf8_lossy(author.email_bytes()),
        "committed_date": format_git_time(commit.time()),
        "parents": commit.parent_ids().map(short_id).collect::<Vec<_>>(),
    })
}

/// Refuse values that `git` would parse as options.
pub(super) fn reject_option_like(value: &str, what: &str) -> ToolResult<()> {
    if value.starts_with('-') {
        return Err(ToolError::invalid_input(format!(
            "{} must not start with '-': {}",
            what, value
        )));
    }
    Ok(())
}

/// Run the `git` executable in `dir` and return its stdout.
///
/// Interactive credential prompts are disabled. A non-zero exit becomes a
/// remote failure carrying git's stderr.
pub(super) fn run_git<S: AsRef<std::ffi::OsStr>>(dir: &Path, args: &[S]) -> ToolResult<String> {
    let shown: Vec<_> = args.iter().map(|a| a.as_ref().to_string_lossy()).collect();
    debug!("git {}", shown.join(" "));

    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .map_err(|e| ToolError::remote(format!("Failed to run git: {}", e)))?;

    if !output.status.success() {
        let command = shown.first().map(|s| s.to_string()).unwrap_or_default();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!("git {} failed: {}", command, stderr);
        return Err(ToolError::remote(format!("git {} failed: {}", command, stderr)));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
