//! Resource definitions module.
//!
//! Each resource is a JSON snapshot derived from the loaded configuration.
//! Snapshots are rendered at read time and never include secrets.
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_status.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

use serde_json::Value;

use crate::core::config::Config;

mod custom_api_status;
mod database_status;
mod github_status;
mod local_git_status;

pub use custom_api_status::CustomApiStatusResource;
pub use database_status::DatabaseStatusResource;
pub use github_status::GithubStatusResource;
pub use local_git_status::LocalGitStatusResource;

/// Placeholder shown for settings that are absent.
pub(crate) const NOT_SET: &str = "not set";

/// Trait for resource definitions.
pub trait ResourceDefinition {
    /// The unique URI of the resource.
    const URI: &'static str;

    /// The display name of the resource.
    const NAME: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str = "application/json";

    /// Render the resource from the current configuration.
    fn snapshot(config: &Config) -> Value;
}

/// `value`, or the placeholder when it is empty.
pub(crate) fn or_not_set(value: &str) -> &str {
    if value.is_empty() { NOT_SET } else { value }
}
