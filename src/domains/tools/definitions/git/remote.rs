//! Remote configuration and network operations.
//!
//! Pull, push and clone run the `git` executable so credential helpers,
//! SSH agents and hooks behave as they do for the user.

use std::ffi::OsStr;
use std::path::Path;

use git2::{Oid, Repository};
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::repo::{LocalGitAdapter, current_branch, open, reject_option_like, run_git};
use crate::core::security::{PathSecurityError, resolve_within};
use crate::domains::tools::{ToolError, ToolResult};

const ORIGIN: &str = "origin";

fn require_remote(repo: &Repository, name: &str) -> ToolResult<()> {
    let names = repo.remotes()?;
    if names.is_empty() {
        return Err(ToolError::not_found("No remotes configured"));
    }
    if !names.iter().flatten().any(|n| n == name) {
        return Err(ToolError::not_found(format!("Remote '{}' not found", name)));
    }
    Ok(())
}

fn head_oid(repo: &Repository) -> Option<Oid> {
    repo.head().ok().and_then(|h| h.target())
}

/// Commits reachable from `after` but not from `before`.
fn commits_between(repo: &Repository, before: Option<Oid>, after: Option<Oid>) -> ToolResult<usize> {
    let Some(after) = after else {
        return Ok(0);
    };
    if before == Some(after) {
        return Ok(0);
    }
    let mut walk = repo.revwalk()?;
    walk.push(after)?;
    if let Some(before) = before {
        walk.hide(before)?;
    }
    Ok(walk.count())
}

fn target_branch(repo: &Repository, branch: Option<String>) -> ToolResult<String> {
    let branch = match branch.filter(|b| !b.trim().is_empty()) {
        Some(branch) => branch,
        None => current_branch(repo)?.ok_or_else(|| {
            ToolError::invalid_input("HEAD is detached; pass the branch explicitly")
        })?,
    };
    reject_option_like(&branch, "branch")?;
    Ok(branch)
}

impl LocalGitAdapter {
    /// Fast-forward the current branch from `origin`.
    #[instrument(skip(self))]
    pub async fn pull(&self, repo_path: &str) -> ToolResult<Value> {
        let (branch, fetched) = self
            .with_repo(repo_path, |dir| {
                let repo = open(dir)?;
                require_remote(&repo, ORIGIN)?;
                let branch = target_branch(&repo, None)?;
                let before = head_oid(&repo);

                run_git(dir, &["pull", "--ff-only", ORIGIN, branch.as_str()])?;

                let repo = open(dir)?;
                let fetched = commits_between(&repo, before, head_oid(&repo))?;
                Ok((branch, fetched))
            })
            .await?;

        info!("Pulled {} commit(s) into {}", fetched, branch);
        Ok(json!({
            "success": true,
            "repo": repo_path,
            "remote": ORIGIN,
            "branch": branch,
            "fetched_commits": fetched,
        }))
    }

    #[instrument(skip(self))]
    pub async fn push(
        &self,
        repo_path: &str,
        remote: &str,
        branch: Option<String>,
    ) -> ToolResult<Value> {
        reject_option_like(remote, "remote")?;
        let remote = remote.to_string();
        let (remote, branch) = self
            .with_repo(repo_path, move |dir| {
                let repo = open(dir)?;
                require_remote(&repo, &remote)?;
                let branch = target_branch(&repo, branch)?;
                run_git(dir, &["push", remote.as_str(), branch.as_str()])?;
                Ok((remote, branch))
            })
            .await?;

        let message = format!("Pushed to {}/{}", remote, branch);
        info!("{}", message);
        Ok(json!({
            "success": true,
            "repo": repo_path,
            "remote": remote,
            "branch": branch,
            "message": message,
        }))
    }

    #[instrument(skip(self))]
    pub async fn remotes(&self, repo_path: &str) -> ToolResult<Value> {
        let remotes = self
            .with_repo(repo_path, |dir| {
                let repo = open(dir)?;
                let names = repo.remotes()?;
                let mut remotes = Vec::new();
                for name in names.iter().flatten() {
                    let remote = repo.find_remote(name)?;
                    let url = remote.url().map(str::to_string);
                    let push_url = remote.pushurl().map(str::to_string).or_else(|| url.clone());
                    remotes.push(json!({
                        "name": name,
                        "urls": url.into_iter().collect::<Vec<_>>(),
                        "push_urls": push_url.into_iter().collect::<Vec<_>>(),
                    }));
                }
                Ok(remotes)
            })
            .await?;

        let empty = remotes.is_empty();
        let mut result = json!({"repo": repo_path, "remotes": remotes});
        if empty {
            result["message"] = json!("No remotes configured");
        }
        Ok(result)
    }

    /// Clone `source_url` into `target_path` beneath the base directory.
    #[instrument(skip(self))]
    pub async fn clone_repo(&self, source_url: &str, target_path: &str) -> ToolResult<Value> {
        if source_url.trim().is_empty() {
            return Err(ToolError::invalid_input("source_url must not be empty"));
        }
        reject_option_like(source_url, "source_url")?;

        let base = self.base_path()?;
        let full = resolve_within(&base, target_path).map_err(|e| match e {
            PathSecurityError::OutsideRoot { .. } => {
                ToolError::access_denied("Access denied: target path outside allowed directory")
            }
            other => other.into(),
        })?;
        if full == base {
            return Err(ToolError::invalid_input("target_path must name a new directory"));
        }
        if full.exists() {
            return Err(ToolError::invalid_input(format!(
                "Target path already exists: {}",
                target_path
            )));
        }

        let relative = full
            .strip_prefix(&base)
            .unwrap_or(Path::new(target_path))
            .to_string_lossy()
            .into_owned();
        let url = source_url.to_string();
        tokio::task::spawn_blocking(move || -> ToolResult<()> {
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let args = [
                OsStr::new("clone"),
                OsStr::new("--"),
                OsStr::new(&url),
                full.as_os_str(),
            ];
            run_git(&base, &args)?;
            Ok(())
        })
        .await??;

        info!("Cloned {} into {}", source_url, relative);
        Ok(json!({
            "success": true,
            "source_url": source_url,
            "target_path": relative,
            "message": "Repository cloned successfully",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{adapter_for, commit_file, git_available, init_repo};
    use super::*;
    use crate::domains::tools::ErrorKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_remotes_listing() {
        let base = TempDir::new().unwrap();
        let repo = init_repo(&base.path().join("proj"));
        let adapter = adapter_for(base.path());

        let result = adapter.remotes("proj").await.unwrap();
        assert_eq!(result["remotes"], json!([]));
        assert_eq!(result["message"], "No remotes configured");

        repo.remote("origin", "https://example.com/org/proj.git").unwrap();
        repo.remote_set_pushurl("origin", Some("git@example.com:org/proj.git"))
            .unwrap();
        let result = adapter.remotes("proj").await.unwrap();
        assert_eq!(
            result["remotes"],
            json!([{
                "name": "origin",
                "urls": ["https://example.com/org/proj.git"],
                "push_urls": ["git@example.com:org/proj.git"],
            }])
        );
        assert!(result.get("message").is_none());
    }

    #[tokio::test]
    async fn test_pull_and_push_require_a_remote() {
        let base = TempDir::new().unwrap();
        let repo = init_repo(&base.path().join("proj"));
        commit_file(&repo, "a.txt", "a", "first");
        let adapter = adapter_for(base.path());

        let err = adapter.pull("proj").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "No remotes configured");

        repo.remote("upstream", "https://example.com/x.git").unwrap();
        let err = adapter.push("proj", "origin", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Remote 'origin' not found");

        let err = adapter.push("proj", "--mirror", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_clone_target_checks() {
        let base = TempDir::new().unwrap();
        std::fs::create_dir(base.path().join("taken")).unwrap();
        let adapter = adapter_for(base.path());

        let err = adapter
            .clone_repo("https://example.com/x.git", "../escape")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccessDenied);
        assert_eq!(
            err.to_string(),
            "Access denied: target path outside allowed directory"
        );

        let err = adapter
            .clone_repo("https://example.com/x.git", "taken")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Target path already exists: taken");
    }

    #[tokio::test]
    async fn test_clone_then_pull_from_local_upstream() {
        if !git_available() {
            return;
        }
        let upstream_dir = TempDir::new().unwrap();
        let upstream = init_repo(upstream_dir.path());
        commit_file(&upstream, "a.txt", "a", "first");

        let base = TempDir::new().unwrap();
        let adapter = adapter_for(base.path());
        let source = upstream_dir.path().to_string_lossy().into_owned();

        let cloned = adapter.clone_repo(&source, "team/proj").await.unwrap();
        assert_eq!(cloned["success"], true);
        assert_eq!(cloned["target_path"], "team/proj");
        assert_eq!(cloned["message"], "Repository cloned successfully");
        assert!(base.path().join("team/proj/a.txt").exists());

        commit_file(&upstream, "b.txt", "b", "second");
        commit_file(&upstream, "c.txt", "c", "third");

        let pulled = adapter.pull("team/proj").await.unwrap();
        assert_eq!(pulled["branch"], "main");
        assert_eq!(pulled["remote"], "origin");
        assert_eq!(pulled["fetched_commits"], 2);
        assert!(base.path().join("team/proj/c.txt").exists());
    }

    #[tokio::test]
    async fn test_push_to_bare_remote() {
        if !git_available() {
            return;
        }
        let remote_dir = TempDir::new().unwrap();
        let bare = Repository::init_bare(remote_dir.path()).unwrap();

        let base = TempDir::new().unwrap();
        let repo = init_repo(&base.path().join("proj"));
        let oid = commit_file(&repo, "a.txt", "a", "first");
        repo.remote("origin", &remote_dir.path().to_string_lossy())
            .unwrap();

        let result = adapter_for(base.path())
            .push("proj", "origin", None)
            .await
            .unwrap();
        assert_eq!(result["message"], "Pushed to origin/main");
        assert_eq!(bare.refname_to_id("refs/heads/main").unwrap(), oid);
    }
}
