mod firestore;
mod memory;

pub use firestore::{FirestoreStore, ServiceAccount, TokenSource};
pub use memory::{MemoryEntry, MemoryStore};

use async_trait::async_trait;
use log::{info, warn};

use crate::error::StoreError;
use crate::model::{NewRecipe, Recipe, StoredRecord};

/// Recipe collection the service reads from and optionally writes to
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Get the store name (e.g., "firestore", "memory")
    fn store_name(&self) -> &str;

    /// Every record in the collection, in the collection's iteration order
    async fn list_all(&self) -> Result<Vec<StoredRecord>, StoreError>;

    /// Add one record; the store assigns the id and creation timestamp
    async fn add(&self, recipe: &NewRecipe) -> Result<String, StoreError>;
}

/// Result of looking up stored recipes for a set of ingredients
#[derive(Debug)]
pub enum LookupOutcome {
    /// At least one stored recipe contains every requested ingredient
    Matched(Vec<Recipe>),
    /// The scan completed without a match
    NoMatch,
    /// The store could not be read; treated as no match by callers
    Unavailable(StoreError),
}

/// Result of writing a generated recipe back to the store
#[derive(Debug)]
pub enum PersistOutcome {
    /// Saving AI recipes is switched off
    Disabled,
    /// Saved under the returned id
    Saved(String),
    /// The write failed; the response is unaffected
    Failed(StoreError),
}

/// Scan the whole collection for recipes whose ingredients are a superset
/// of the (already normalized) requested ingredients.
pub async fn search_recipes(store: &dyn RecipeStore, ingredients: &[String]) -> LookupOutcome {
    let records = match store.list_all().await {
        Ok(records) => records,
        Err(e) => {
            warn!("Database search error ({}): {}", store.store_name(), e);
            return LookupOutcome::Unavailable(e);
        }
    };

    let total = records.len();
    let matches: Vec<Recipe> = records
        .into_iter()
        .filter(|record| record.contains_all(ingredients))
        .map(StoredRecord::into_recipe)
        .collect();

    info!(
        "Found {} matching recipe(s) out of {} in {}",
        matches.len(),
        total,
        store.store_name()
    );

    if matches.is_empty() {
        LookupOutcome::NoMatch
    } else {
        LookupOutcome::Matched(matches)
    }
}

/// Write a generated recipe back if `enabled`; failures are logged only.
pub async fn save_recipe(store: &dyn RecipeStore, recipe: &NewRecipe, enabled: bool) -> PersistOutcome {
    if !enabled {
        return PersistOutcome::Disabled;
    }

    match store.add(recipe).await {
        Ok(id) => {
            info!("Saved AI recipe '{}' as {}", recipe.title, id);
            PersistOutcome::Saved(id)
        }
        Err(e) => {
            warn!("Failed to save AI recipe: {}", e);
            PersistOutcome::Failed(e)
        }
    }
}
