//! Local git status resource definition.

use serde_json::{Value, json};
use tracing::debug;

use super::{NOT_SET, ResourceDefinition};
use crate::core::config::Config;
use crate::domains::tools::definitions::git::LocalGitAdapter;

pub struct LocalGitStatusResource;

impl ResourceDefinition for LocalGitStatusResource {
    const URI: &'static str = "config://local-git-status";
    const NAME: &'static str = "Local Git Status";
    const DESCRIPTION: &'static str = "Local git base directory and the repositories found beneath it";

    fn snapshot(config: &Config) -> Value {
        let local_git = &config.local_git;
        let base_path = match &local_git.base_path {
            Some(path) => path
                .canonicalize()
                .unwrap_or_else(|_| path.clone())
                .display()
                .to_string(),
            None => NOT_SET.to_string(),
        };
        let configured = local_git.base_path.as_ref().is_some_and(|p| p.is_dir());

        let repos = LocalGitAdapter::new(local_git.clone())
            .repositories()
            .unwrap_or_else(|e| {
                debug!("No repositories listed: {}", e);
                Vec::new()
            });

        json!({
            "base_path": base_path,
            "configured": configured,
            "default_branch": local_git.default_branch,
            "available_repos": repos,
        })
    }
}
