//! Working tree status from `git status --porcelain`.
//!
//! Each entry carries two status letters: X for the index and Y for the
//! worktree. Bucketing:
//!
//! - `??` goes to `untracked` and nowhere else.
//! - X in `M A D R C T` puts the path in `staged`.
//! - Y in `M D T`, or a `U` on either side, puts it in `modified`.
//!
//! A path that is staged and then edited again lands in both `staged` and
//! `modified`, so neither change is hidden.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::repo::{LocalGitAdapter, branch_label, open, run_git};
use crate::domains::tools::ToolResult;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBuckets {
    pub staged: Vec<String>,
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
}

impl StatusBuckets {
    /// Tracked content differs from HEAD, in the index or the worktree.
    pub fn is_dirty(&self) -> bool {
        !self.staged.is_empty() || !self.modified.is_empty()
    }
}

/// Parse `git status --porcelain=v1 -z` output.
pub fn parse_porcelain(output: &str) -> StatusBuckets {
    let mut buckets = StatusBuckets::default();
    let mut fields = output.split('\0');

    while let Some(entry) = fields.next() {
        let mut codes = entry.chars();
        let (Some(x), Some(y), Some(path)) = (codes.next(), codes.next(), entry.get(3..)) else {
            continue;
        };
        if path.is_empty() {
            continue;
        }
        // Renames and copies are followed by their source path.
        if matches!(x, 'R' | 'C') {
            fields.next();
        }

        match (x, y) {
            ('?', '?') => buckets.untracked.push(path.to_string()),
            ('!', '!') => {}
            _ => {
                if matches!(x, 'M' | 'A' | 'D' | 'R' | 'C' | 'T') {
                    buckets.staged.push(path.to_string());
                }
                if matches!(y, 'M' | 'D' | 'T') || x == 'U' || y == 'U' {
                    buckets.modified.push(path.to_string());
                }
            }
        }
    }
    buckets
}

impl LocalGitAdapter {
    #[instrument(skip(self))]
    pub async fn status(&self, repo_path: &str) -> ToolResult<Value> {
        let (branch, buckets) = self
            .with_repo(repo_path, |dir| {
                let branch = branch_label(&open(dir)?)?;
                let output = run_git(dir, &["status", "--porcelain=v1", "-z"])?;
                Ok((branch, parse_porcelain(&output)))
            })
            .await?;

        Ok(json!({
            "repo": repo_path,
            "branch": branch,
            "is_dirty": buckets.is_dirty(),
            "modified": buckets.modified,
            "staged": buckets.staged,
            "untracked": buckets.untracked,
        }))
    }
}
