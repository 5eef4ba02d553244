use std::sync::Arc;

use log::{info, warn};

use crate::config::AppConfig;
use crate::error::{ApiError, SetupError};
use crate::generator::{GenerationOutcome, RecipeGenerator};
use crate::model::{Ingredients, NewRecipe, RecipeRequest, RecipeResponse};
use crate::providers::{LlmProvider, TogetherProvider};
use crate::store::{
    save_recipe, search_recipes, FirestoreStore, LookupOutcome, MemoryStore, PersistOutcome,
    RecipeStore,
};

/// Full result of handling one request, including the degraded branches
/// that never reach the caller.
#[derive(Debug)]
pub struct RecipeReport {
    pub response: RecipeResponse,
    /// `None` when generation was forced and the store was skipped
    pub lookup: Option<LookupOutcome>,
    /// `None` when a stored recipe matched
    pub generation: Option<GenerationOutcome>,
    pub persist: Option<PersistOutcome>,
}

/// Database-first, AI-fallback recipe lookup
#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
    generator: RecipeGenerator,
    save_ai_recipes: bool,
}

impl RecipeService {
    pub fn new(
        store: Arc<dyn RecipeStore>,
        provider: Arc<dyn LlmProvider>,
        save_ai_recipes: bool,
    ) -> Self {
        RecipeService {
            store,
            generator: RecipeGenerator::new(provider),
            save_ai_recipes,
        }
    }

    /// Wire the Firestore store (or the in-memory one when credentials are
    /// missing) and the Together provider from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, SetupError> {
        let store: Arc<dyn RecipeStore> = match config.service_account() {
            Some(account) => {
                info!("Using Firestore project '{}'", account.project_id);
                Arc::new(FirestoreStore::new(config, account)?)
            }
            None => {
                warn!("Firestore credentials not configured, using in-memory recipe store");
                Arc::new(MemoryStore::new())
            }
        };

        if config.together_api_key.is_none() {
            warn!("TOGETHER_API_KEY not set, generated recipes will use the fallback");
        }
        let provider = Arc::new(TogetherProvider::new(config)?);

        Ok(Self::new(store, provider, config.save_ai_recipes))
    }

    /// Handle a request and return only what the caller sees
    pub async fn handle(&self, request: RecipeRequest) -> Result<RecipeResponse, ApiError> {
        Ok(self.handle_with_report(request).await?.response)
    }

    /// Handle a request, keeping the outcome of every step
    pub async fn handle_with_report(&self, request: RecipeRequest) -> Result<RecipeReport, ApiError> {
        let raw = request.ingredients.unwrap_or_default();
        let ingredients = Ingredients::from_raw(&raw).ok_or(ApiError::NoIngredients)?;
        let force_ai = request.force_ai.unwrap_or(false);

        let lookup = if force_ai {
            info!("Forced AI generation, skipping store lookup");
            None
        } else {
            match search_recipes(self.store.as_ref(), ingredients.as_slice()).await {
                LookupOutcome::Matched(recipes) => {
                    return Ok(RecipeReport {
                        response: RecipeResponse::Database {
                            recipes: recipes.clone(),
                        },
                        lookup: Some(LookupOutcome::Matched(recipes)),
                        generation: None,
                        persist: None,
                    });
                }
                other => Some(other),
            }
        };

        let generation = self.generator.generate(&ingredients).await;
        let recipe = generation.recipe().clone();

        let persist = save_recipe(
            self.store.as_ref(),
            &NewRecipe::from_generated(&recipe, &ingredients),
            self.save_ai_recipes,
        )
        .await;

        Ok(RecipeReport {
            response: RecipeResponse::Ai { recipe },
            lookup,
            generation: Some(generation),
            persist: Some(persist),
        })
    }
}
