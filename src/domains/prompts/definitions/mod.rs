//! Prompt definitions module.
//!
//! Each prompt is a fixed block of guidance for one backend family. None
//! take arguments.
//!
//! ## Adding a New Prompt
//!
//! 1. Create a new file (e.g., `my_prompt.rs`)
//! 2. Implement the `PromptDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

mod database_query_helper;
mod file_system_helper;
mod github_helper;
mod local_git_helper;

pub use database_query_helper::DatabaseQueryHelperPrompt;
pub use file_system_helper::FileSystemHelperPrompt;
pub use github_helper::GithubHelperPrompt;
pub use local_git_helper::LocalGitHelperPrompt;

/// Trait for prompt definitions.
pub trait PromptDefinition {
    /// The unique name of the prompt.
    const NAME: &'static str;

    /// A description of what the prompt does.
    const DESCRIPTION: &'static str;

    /// The text sent as a single user message.
    fn text() -> &'static str;
}
