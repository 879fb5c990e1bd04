//! Branch listing and checkout.

use git2::build::CheckoutBuilder;
use git2::{BranchType, Repository};
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::repo::{LocalGitAdapter, branch_label, open};
use crate::domains::tools::{ToolError, ToolResult};

fn branch_names(repo: &Repository, kind: BranchType) -> ToolResult<Vec<String>> {
    let mut names = Vec::new();
    for branch in repo.branches(Some(kind))? {
        let (branch, _) = branch?;
        if let Some(name) = branch.name()? {
            // `origin/HEAD` is a symbolic alias, not a branch.
            if !name.ends_with("/HEAD") {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Check out the tree of `refname` and point HEAD at it.
fn switch_to(repo: &Repository, refname: &str) -> ToolResult<()> {
    let target = repo.revparse_single(refname)?;
    repo.checkout_tree(&target, Some(CheckoutBuilder::new().safe()))?;
    repo.set_head(refname)?;
    Ok(())
}

/// Remote-tracking branch `<remote>/<branch>`, when exactly one remote has it.
fn unique_remote_branch<'r>(
    repo: &'r Repository,
    branch: &str,
) -> ToolResult<Option<git2::Branch<'r>>> {
    let suffix = format!("/{}", branch);
    let mut matches = Vec::new();
    for entry in repo.branches(Some(BranchType::Remote))? {
        let (candidate, _) = entry?;
        if candidate.name()?.is_some_and(|n| n.ends_with(&suffix)) {
            matches.push(candidate);
        }
    }
    Ok(if matches.len() == 1 { matches.pop() } else { None })
}

fn checkout(repo: &Repository, branch: &str, create: bool) -> ToolResult<&'static str> {
    let local = repo.find_branch(branch, BranchType::Local).ok();
    let local_ref = format!("refs/heads/{}", branch);

    if create && local.is_none() {
        let head = repo.head()?.peel_to_commit()?;
        repo.branch(branch, &head, false)?;
        switch_to(repo, &local_ref)?;
        return Ok("created and checked out");
    }
    if local.is_some() {
        switch_to(repo, &local_ref)?;
        return Ok("checked out");
    }

    if let Some(remote) = unique_remote_branch(repo, branch)? {
        let upstream = remote.name()?.unwrap_or_default().to_string();
        let commit = remote.get().peel_to_commit()?;
        let mut tracking = repo.branch(branch, &commit, false)?;
        tracking.set_upstream(Some(&upstream))?;
        switch_to(repo, &local_ref)?;
        return Ok("checked out");
    }

    // Tags and commit ids leave HEAD detached.
    let commit = repo.revparse_single(branch)?.peel_to_commit()?;
    repo.checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().safe()))?;
    repo.set_head_detached(commit.id())?;
    Ok("checked out")
}

impl LocalGitAdapter {
    #[instrument(skip(self))]
    pub async fn list_branches(&self, repo_path: &str) -> ToolResult<Value> {
        self.with_repo(repo_path, |dir| {
            let repo = open(dir)?;
            Ok(json!({
                "current": branch_label(&repo)?,
                "local": branch_names(&repo, BranchType::Local)?,
                "remote": branch_names(&repo, BranchType::Remote)?,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn checkout(&self, repo_path: &str, branch: &str, create: bool) -> ToolResult<Value> {
        if branch.trim().is_empty() {
            return Err(ToolError::invalid_input("branch must not be empty"));
        }
        let target = branch.to_string();
        let action = self
            .with_repo(repo_path, move |dir| checkout(&open(dir)?, &target, create))
            .await?;

        info!("Branch {}", action);
        Ok(json!({
            "success": true,
            "repo": repo_path,
            "branch": branch,
            "action": action,
        }))
    }
}
