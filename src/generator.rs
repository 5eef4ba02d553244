use std::sync::Arc;

use log::{info, warn};

use crate::error::GenerationError;
use crate::fallback::fallback_recipe;
use crate::model::{Ingredients, Recipe};
use crate::parser::parse_recipe_text;
use crate::providers::{build_recipe_prompt, LlmProvider, SYSTEM_PROMPT};

/// Result of a generation attempt. Both variants carry a usable recipe.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// The provider answered and its text was parsed
    Parsed(Recipe),
    /// The provider call failed; the deterministic fallback recipe is used
    Fallback {
        recipe: Recipe,
        error: GenerationError,
    },
}

impl GenerationOutcome {
    pub fn recipe(&self) -> &Recipe {
        match self {
            GenerationOutcome::Parsed(recipe) => recipe,
            GenerationOutcome::Fallback { recipe, .. } => recipe,
        }
    }

    pub fn into_recipe(self) -> Recipe {
        match self {
            GenerationOutcome::Parsed(recipe) => recipe,
            GenerationOutcome::Fallback { recipe, .. } => recipe,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, GenerationOutcome::Fallback { .. })
    }
}

/// Asks an [`LlmProvider`] for a recipe and turns the answer into a [`Recipe`]
#[derive(Clone)]
pub struct RecipeGenerator {
    provider: Arc<dyn LlmProvider>,
}

impl RecipeGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        RecipeGenerator { provider }
    }

    pub async fn generate(&self, ingredients: &Ingredients) -> GenerationOutcome {
        let prompt = build_recipe_prompt(ingredients.as_slice());

        match self.provider.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(text) => {
                info!(
                    "Generated recipe text using {}",
                    self.provider.provider_name()
                );
                GenerationOutcome::Parsed(parse_recipe_text(&text, ingredients.as_slice()))
            }
            Err(error) => {
                warn!(
                    "AI generation error from {}: {}",
                    self.provider.provider_name(),
                    error
                );
                GenerationOutcome::Fallback {
                    recipe: fallback_recipe(ingredients),
                    error,
                }
            }
        }
    }
}
