mod prompt;
mod together;

pub use prompt::{build_recipe_prompt, RECIPE_PROMPT_TEMPLATE, SYSTEM_PROMPT};
pub use together::{SamplingParams, TogetherProvider};

use async_trait::async_trait;

use crate::error::GenerationError;

/// Chat-completion backend used to generate recipe text
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "together")
    fn provider_name(&self) -> &str;

    /// Send a system + user message pair and return the first completion
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError>;
}
