pub mod api;
pub mod config;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod providers;
pub mod service;
pub mod store;

pub use api::{parse_request, router};
pub use config::AppConfig;
pub use error::{ApiError, GenerationError, SetupError, StoreError};
pub use fallback::fallback_recipe;
pub use generator::{GenerationOutcome, RecipeGenerator};
pub use model::{Ingredients, NewRecipe, Recipe, RecipeRequest, RecipeResponse, StoredRecord};
pub use normalize::normalize_ingredients;
pub use parser::parse_recipe_text;
pub use providers::{LlmProvider, TogetherProvider};
pub use service::{RecipeReport, RecipeService};
pub use store::{FirestoreStore, LookupOutcome, MemoryStore, PersistOutcome, RecipeStore};

use axum::Router;

/// Build the HTTP application from configuration
pub fn app(config: &AppConfig) -> Result<Router, SetupError> {
    let service = RecipeService::from_config(config)?;
    Ok(router(service))
}

/// Find a recipe for the given ingredients using configuration from the
/// environment: stored recipes first, a generated one otherwise.
///
/// # Example
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let response = recipe_finder::find_recipe(vec!["egg".into(), "flour".into()]).await?;
/// println!("{}", serde_json::to_string_pretty(&response)?);
/// # Ok(())
/// # }
/// ```
pub async fn find_recipe(
    ingredients: Vec<String>,
) -> Result<RecipeResponse, Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::load()?;
    let service = RecipeService::from_config(&config)?;
    Ok(service.handle(RecipeRequest::new(ingredients)).await?)
}
