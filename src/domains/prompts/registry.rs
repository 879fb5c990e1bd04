//! Prompt Registry - central registration of all prompts.
//!
//! When adding a new prompt:
//! 1. Create the prompt file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `get_all_prompts()`

use super::definitions::{
    DatabaseQueryHelperPrompt, FileSystemHelperPrompt, GithubHelperPrompt, LocalGitHelperPrompt,
    PromptDefinition,
};
use super::service::PromptEntry;

fn build_entry<P: PromptDefinition>() -> PromptEntry {
    PromptEntry {
        name: P::NAME,
        description: P::DESCRIPTION,
        text: P::text(),
    }
}

/// Get all registered prompts.
pub fn get_all_prompts() -> Vec<PromptEntry> {
    vec![
        build_entry::<DatabaseQueryHelperPrompt>(),
        build_entry::<FileSystemHelperPrompt>(),
        build_entry::<GithubHelperPrompt>(),
        build_entry::<LocalGitHelperPrompt>(),
    ]
}

/// Get the list of all prompt names.
pub fn prompt_names() -> Vec<&'static str> {
    get_all_prompts().iter().map(|p| p.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names() {
        assert_eq!(
            prompt_names(),
            vec![
                "database_query_helper",
                "file_system_helper",
                "github_helper",
                "local_git_helper",
            ]
        );
    }

    #[test]
    fn test_prompts_mention_their_tools() {
        let prompts = get_all_prompts();
        assert!(prompts[0].text.contains("mysql_execute_query"));
        assert!(prompts[1].text.contains("filesystem_search"));
        assert!(prompts[2].text.contains("github_create_issue"));
        assert!(prompts[3].text.contains("git_checkout_branch"));
    }
}
