//! Prompt service implementation.
//!
//! Prompts are defined in `definitions/` and registered via `registry.rs`.
//! Adding a new prompt does NOT require modifying this file.

use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};
use tracing::{debug, info};

use super::error::PromptError;
use super::registry::get_all_prompts;

/// A registered prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub text: &'static str,
}

/// Service for listing and fetching prompts.
pub struct PromptService {
    /// Registered prompts, in listing order.
    prompts: Vec<PromptEntry>,
}

impl PromptService {
    pub fn new() -> Self {
        info!("Initializing PromptService");

        let prompts = get_all_prompts();
        for prompt in &prompts {
            debug!("Registering prompt: {}", prompt.name);
        }

        Self { prompts }
    }

    /// List all available prompts.
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        self.prompts
            .iter()
            .map(|entry| Prompt {
                name: entry.name.to_string(),
                title: None,
                description: Some(entry.description.to_string()),
                arguments: None,
                icons: None,
                meta: None,
            })
            .collect()
    }

    /// Get a prompt as a single user message.
    pub async fn get_prompt(&self, name: &str) -> Result<GetPromptResult, PromptError> {
        let entry = self
            .prompts
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| PromptError::not_found(name))?;

        Ok(GetPromptResult {
            description: Some(entry.description.to_string()),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, entry.text)],
        })
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::PromptMessageContent;

    #[tokio::test]
    async fn test_lists_four_prompts_without_arguments() {
        let prompts = PromptService::new().list_prompts().await;
        assert_eq!(prompts.len(), 4);
        assert!(prompts.iter().all(|p| p.arguments.is_none()));
    }

    #[tokio::test]
    async fn test_get_prompt_is_one_user_message() {
        let result = PromptService::new()
            .get_prompt("local_git_helper")
            .await
            .unwrap();

        assert_eq!(result.messages.len(), 1);
        assert!(matches!(result.messages[0].role, PromptMessageRole::User));
        let PromptMessageContent::Text { text } = &result.messages[0].content else {
            panic!("expected text content");
        };
        assert!(text.contains("git_list_repos"));
    }

    #[tokio::test]
    async fn test_get_nonexistent_prompt() {
        let err = PromptService::new().get_prompt("nonexistent").await.unwrap_err();
        assert!(matches!(err, PromptError::NotFound(_)));
    }
}
