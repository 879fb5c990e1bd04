//! GitHub status resource definition.

use serde_json::{Value, json};

use super::{ResourceDefinition, or_not_set};
use crate::core::config::Config;

pub struct GithubStatusResource;

impl ResourceDefinition for GithubStatusResource {
    const URI: &'static str = "config://github-status";
    const NAME: &'static str = "GitHub Status";
    const DESCRIPTION: &'static str = "GitHub integration status and target repository";

    fn snapshot(config: &Config) -> Value {
        let github = &config.github;
        json!({
            "configured": github.is_configured(),
            "owner": or_not_set(&github.owner),
            "repo": or_not_set(&github.repo),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_and_no_token() {
        let mut config = Config::default();
        config.github.token = "ghp_secret".to_string();
        config.github.owner = "octo".to_string();

        let snapshot = GithubStatusResource::snapshot(&config);
        assert_eq!(
            snapshot,
            json!({"configured": true, "owner": "octo", "repo": "not set"})
        );
        assert!(!snapshot.to_string().contains("ghp_secret"));
    }
}
