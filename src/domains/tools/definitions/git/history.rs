//! Commit history: log, show, tags and per-file diffs.

use git2::{DiffFormat, Repository, Sort};
use serde_json::{Value, json};
use tracing::instrument;

use super::repo::{
    LocalGitAdapter, branch_label, commit_info, open, reject_option_like, run_git, short_id,
};
use crate::domains::tools::{ToolError, ToolResult};

/// Unified diff between a commit and its first parent.
fn first_parent_patch(repo: &Repository, commit: &git2::Commit<'_>) -> ToolResult<String> {
    if commit.parent_count() == 0 {
        return Ok("Initial commit".to_string());
    }
    let parent_tree = commit.parent(0)?.tree()?;
    let diff = repo.diff_tree_to_tree(Some(&parent_tree), Some(&commit.tree()?), None)?;

    let mut patch = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        if matches!(line.origin(), '+' | '-' | ' ') {
            patch.push(line.origin());
        }
        patch.push_str(&String::from_utf8_lossy(line.content()));
        true
    })?;
    Ok(patch)
}

impl LocalGitAdapter {
    /// Newest-first history of `branch` (any revision), or of HEAD.
    #[instrument(skip(self))]
    pub async fn log(
        &self,
        repo_path: &str,
        max_count: usize,
        branch: Option<String>,
    ) -> ToolResult<Value> {
        let (label, commits) = self
            .with_repo(repo_path, move |dir| {
                let repo = open(dir)?;
                let mut walk = repo.revwalk()?;
                walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
                let label = match &branch {
                    Some(rev) => {
                        let commit = repo.revparse_single(rev)?.peel_to_commit()?;
                        walk.push(commit.id())?;
                        rev.clone()
                    }
                    None => {
                        walk.push_head()?;
                        branch_label(&repo)?
                    }
                };

                let mut commits = Vec::new();
                for oid in walk.take(max_count) {
                    commits.push(commit_info(&repo.find_commit(oid?)?));
                }
                Ok((label, commits))
            })
            .await?;

        Ok(json!({
            "repo": repo_path,
            "branch": label,
            "count": commits.len(),
            "commits": commits,
        }))
    }

    #[instrument(skip(self))]
    pub async fn show_commit(&self, repo_path: &str, sha: &str) -> ToolResult<Value> {
        if sha.trim().is_empty() {
            return Err(ToolError::invalid_input("sha must not be empty"));
        }
        let sha = sha.to_string();
        self.with_repo(repo_path, move |dir| {
            let repo = open(dir)?;
            let commit = repo.revparse_single(&sha)?.peel_to_commit()?;
            let mut info = commit_info(&commit);
            info["diff"] = Value::String(first_parent_patch(&repo, &commit)?);
            Ok(info)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn list_tags(&self, repo_path: &str) -> ToolResult<Value> {
        let tags = self
            .with_repo(repo_path, |dir| {
                let repo = open(dir)?;
                let names = repo.tag_names(None)?;
                let mut names: Vec<&str> = names.iter().flatten().collect();
                names.sort_unstable();
                let tags: Vec<Value> = names
                    .into_iter()
                    .map(|name| {
                        // Tags on trees or blobs have no commit.
                        let commit = repo
                            .revparse_single(&format!("refs/tags/{}", name))
                            .and_then(|obj| obj.peel_to_commit())
                            .ok()
                            .map(|c| short_id(c.id()));
                        json!({"name": name, "commit": commit})
                    })
                    .collect();
                Ok(tags)
            })
            .await?;

        Ok(json!({
            "repo": repo_path,
            "count": tags.len(),
            "tags": tags,
        }))
    }

    /// `git diff <branch|HEAD> -- <file>`.
    #[instrument(skip(self))]
    pub async fn file_diff(
        &self,
        repo_path: &str,
        file_path: &str,
        branch: Option<String>,
    ) -> ToolResult<Value> {
        if file_path.trim().is_empty() {
            return Err(ToolError::invalid_input("file_path must not be empty"));
        }
        if let Some(branch) = &branch {
            reject_option_like(branch, "branch")?;
        }
        let file = file_path.to_string();

        let (label, diff) = self
            .with_repo(repo_path, move |dir| {
                let base = branch.as_deref().unwrap_or("HEAD");
                let diff = run_git(dir, &["diff", base, "--", file.as_str()])?;
                let label = match branch {
                    Some(branch) => branch,
                    None => branch_label(&open(dir)?)?,
                };
                Ok((label, diff))
            })
            .await?;

        let diff = if diff.is_empty() {
            "No changes".to_string()
        } else {
            diff
        };
        Ok(json!({
            "repo": repo_path,
            "file": file_path,
            "branch": label,
            "diff": diff,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{adapter_for, commit_file, git_available, init_repo};
    use super::*;
    use crate::domains::tools::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_log_newest_first_with_limit() {
        let base = TempDir::new().unwrap();
        let repo = init_repo(&base.path().join("proj"));
        commit_file(&repo, "a.txt", "a", "first");
        commit_file(&repo, "b.txt", "b", "second");
        let third = commit_file(&repo, "c.txt", "c", "third");

        let adapter = adapter_for(base.path());
        let result = adapter.log("proj", 2, None).await.unwrap();

        assert_eq!(result["branch"], "main");
        assert_eq!(result["count"], 2);
        assert_eq!(result["commits"][0]["full_sha"], third.to_string());
        assert_eq!(result["commits"][1]["message"], "second");

        let result = adapter.log("proj", 10, Some("main~2".to_string())).await.unwrap();
        assert_eq!(result["count"], 1);
        assert_eq!(result["branch"], "main~2");
    }

    #[tokio::test]
    async fn test_log_keeps_ancestry_order_within_one_second() {
        let base = TempDir::new().unwrap();
        let repo = init_repo(&base.path().join("proj"));
        for i in 0..5 {
            commit_file(&repo, &format!("f{i}.txt"), "x", &format!("c{i}"));
        }

        let result = adapter_for(base.path()).log("proj", 3, None).await.unwrap();
        let messages: Vec<&str> = result["commits"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["message"].as_str().unwrap())
            .collect();
        assert_eq!(messages, vec!["c4", "c3", "c2"]);
    }

    #[tokio::test]
    async fn test_show_commit_diff_and_root_sentinel() {
        let base = TempDir::new().unwrap();
        let repo = init_repo(&base.path().join("proj"));
        let root = commit_file(&repo, "notes.txt", "one\n", "root");
        let second = commit_file(&repo, "notes.txt", "one\ntwo\n", "append");
        let adapter = adapter_for(base.path());

        let result = adapter
            .show_commit("proj", &second.to_string()[..7])
            .await
            .unwrap();
        assert_eq!(result["message"], "append");
        let diff = result["diff"].as_str().unwrap();
        assert!(diff.contains("+two"));
        assert!(diff.contains("notes.txt"));

        let result = adapter.show_commit("proj", &root.to_string()).await.unwrap();
        assert_eq!(result["diff"], "Initial commit");
        assert_eq!(result["parents"], json!([]));

        let err = adapter.show_commit("proj", "deadbeef").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_tags() {
        let base = TempDir::new().unwrap();
        let repo = init_repo(&base.path().join("proj"));
        let oid = commit_file(&repo, "a.txt", "a", "first");
        let commit = repo.find_object(oid, None).unwrap();
        repo.tag_lightweight("v0.1.0", &commit, false).unwrap();
        let sig = git2::Signature::now("Test User", "test@example.com").unwrap();
        repo.tag("v0.2.0", &commit, &sig, "annotated", false).unwrap();

        let result = adapter_for(base.path()).list_tags("proj").await.unwrap();
        assert_eq!(result["count"], 2);
        assert_eq!(result["tags"][0], json!({"name": "v0.1.0", "commit": short_id(oid)}));
        assert_eq!(result["tags"][1]["commit"], short_id(oid));
    }

    #[tokio::test]
    async fn test_file_diff_against_head() {
        if !git_available() {
            return;
        }
        let base = TempDir::new().unwrap();
        let repo = init_repo(&base.path().join("proj"));
        commit_file(&repo, "lib.rs", "fn a() {}\n", "initial");
        let adapter = adapter_for(base.path());

        let result = adapter.file_diff("proj", "lib.rs", None).await.unwrap();
        assert_eq!(result["diff"], "No changes");
        assert_eq!(result["branch"], "main");

        fs::write(base.path().join("proj/lib.rs"), "fn b() {}\n").unwrap();
        let result = adapter.file_diff("proj", "lib.rs", None).await.unwrap();
        assert!(result["diff"].as_str().unwrap().contains("+fn b() {}"));

        let err = adapter
            .file_diff("proj", "lib.rs", Some("--output=/tmp/x".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
