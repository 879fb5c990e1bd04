//! Staging and committing.

use std::path::Path;

use git2::{IndexAddOption, Repository, Signature, Status, StatusOptions};
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::repo::{LocalGitAdapter, open, short_id};
use crate::core::security::resolve_within;
use crate::domains::tools::{ToolError, ToolResult};

/// What a stage-all reports: paths added or modified in the index.
const INDEX_ADDED_OR_MODIFIED: Status = Status::INDEX_NEW.union(Status::INDEX_MODIFIED);

fn statuses(repo: &Repository) -> ToolResult<Vec<(String, Status)>> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true).recurse_untracked_dirs(true);
    let entries = repo.statuses(Some(&mut opts))?;
    Ok(entries
        .iter()
        .filter_map(|e| e.path().map(|p| (p.to_string(), e.status())))
        .collect())
}

fn stage_file(repo: &Repository, dir: &Path, file_path: &str) -> ToolResult<Vec<String>> {
    let full = resolve_within(dir, file_path)?;
    let relative = full
        .strip_prefix(dir)
        .map_err(|_| ToolError::invalid_input(format!("Invalid file path: {}", file_path)))?
        .to_path_buf();
    if relative.as_os_str().is_empty() {
        return Err(ToolError::invalid_input("file_path must name a file"));
    }

    let mut index = repo.index()?;
    // A deleted file can still be staged while the index knows it.
    if !full.exists() && index.get_path(&relative, 0).is_none() {
        return Err(ToolError::not_found(format!("File not found: {}", file_path)));
    }

    index.add_all([relative.as_path()], IndexAddOption::DEFAULT, None)?;
    index.update_all([relative.as_path()], None)?;
    index.write()?;
    Ok(vec![relative.to_string_lossy().into_owned()])
}

fn stage_all(repo: &Repository) -> ToolResult<Vec<String>> {
    let mut index = repo.index()?;
    index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
    index.update_all(["*"], None)?;
    index.write()?;

    Ok(statuses(repo)?
        .into_iter()
        .filter(|(_, status)| status.intersects(INDEX_ADDED_OR_MODIFIED))
        .map(|(path, _)| path)
        .collect())
}

/// The author for a commit: explicit values win over the repository identity.
fn author_signature(
    repo: &Repository,
    name: Option<&str>,
    email: Option<&str>,
) -> ToolResult<Signature<'static>> {
    let default = repo.signature().ok();
    let name = name
        .map(str::to_string)
        .or_else(|| default.as_ref().and_then(|s| s.name().map(str::to_string)));
    let email = email
        .map(str::to_string)
        .or_else(|| default.as_ref().and_then(|s| s.email().map(str::to_string)));

    match (name, email) {
        (Some(name), Some(email)) => Ok(Signature::now(&name, &email)?),
        _ => Err(ToolError::invalid_input(
            "No author identity: pass author_name and author_email or set user.name and user.email",
        )),
    }
}

fn commit(
    repo: &Repository,
    message: &str,
    author_name: Option<&str>,
    author_email: Option<&str>,
) -> ToolResult<git2::Oid> {
    let mut index = repo.index()?;
    let tree_id = index.write_tree()?;
    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
        Err(e) => return Err(e.into()),
    };

    let has_staged = match &parent {
        Some(parent) => parent.tree_id() != tree_id,
        None => !index.is_empty(),
    };
    if !has_staged {
        if statuses(repo)?.is_empty() {
            return Err(ToolError::invalid_input(
                "Nothing to commit - working tree is clean",
            ));
        }
        return Err(ToolError::invalid_input("No changes added to commit"));
    }

    let author = author_signature(repo, author_name, author_email)?;
    let committer = repo.signature().unwrap_or_else(|_| author.clone());
    let tree = repo.find_tree(tree_id)?;
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    Ok(repo.commit(Some("HEAD"), &author, &committer, message, &tree, &parents)?)
}

impl LocalGitAdapter {
    /// Stage one file, or everything when `file_path` is `None`.
    #[instrument(skip(self))]
    pub async fn stage(&self, repo_path: &str, file_path: Option<String>) -> ToolResult<Value> {
        let staged = self
            .with_repo(repo_path, move |dir| {
                let repo = open(dir)?;
                match file_path.as_deref() {
                    Some(file) if !file.trim().is_empty() => stage_file(&repo, dir, file),
                    _ => stage_all(&repo),
                }
            })
            .await?;

        info!("Staged {} path(s)", staged.len());
        Ok(json!({
            "success": true,
            "repo": repo_path,
            "staged": staged,
        }))
    }

    #[instrument(skip(self, message))]
    pub async fn commit(
        &self,
        repo_path: &str,
        message: &str,
        author_name: Option<String>,
        author_email: Option<String>,
    ) -> ToolResult<Value> {
        if message.trim().is_empty() {
            return Err(ToolError::invalid_input("Commit message must not be empty"));
        }
        let text = message.to_string();
        let oid = self
            .with_repo(repo_path, move |dir| {
                commit(
                    &open(dir)?,
                    &text,
                    author_name.as_deref(),
                    author_email.as_deref(),
                )
            })
            .await?;

        info!("Created commit {}", short_id(oid));
        Ok(json!({
            "success": true,
            "repo": repo_path,
            "sha": short_id(oid),
            "full_sha": oid.to_string(),
            "message": message,
        }))
    }
}
