use serde::{Deserialize, Serialize};

use crate::normalize::normalize_ingredients;

/// A recipe as returned to the caller.
///
/// `id` is only present for recipes read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

/// Normalized, non-empty list of requested ingredients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredients(Vec<String>);

impl Ingredients {
    /// Normalize raw input. Returns `None` for an empty list.
    pub fn from_raw(raw: &[String]) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(Ingredients(normalize_ingredients(raw)))
        }
    }

    pub fn first(&self) -> &str {
        // non-empty by construction
        &self.0[0]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// A record as listed from the store, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl StoredRecord {
    /// True when every requested ingredient appears in the record's
    /// lower-cased ingredient list.
    pub fn contains_all(&self, requested: &[String]) -> bool {
        let stored: Vec<String> = self.ingredients.iter().map(|i| i.to_lowercase()).collect();
        requested.iter().all(|wanted| stored.contains(wanted))
    }

    pub fn into_recipe(self) -> Recipe {
        Recipe {
            id: Some(self.id),
            title: self.title.unwrap_or_else(|| "Untitled Recipe".to_string()),
            description: self.description.unwrap_or_default(),
            ingredients: self.ingredients,
            instructions: self.instructions,
        }
    }
}

/// A generated recipe about to be written back to the store.
/// The store assigns the id and the creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub source: String,
}

impl NewRecipe {
    /// Record for an AI recipe, keyed by the request's normalized ingredients
    /// so later lookups with the same ingredients can find it.
    pub fn from_generated(recipe: &Recipe, ingredients: &Ingredients) -> Self {
        NewRecipe {
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            ingredients: ingredients.as_slice().iter().map(|i| i.to_lowercase()).collect(),
            instructions: recipe.instructions.clone(),
            source: "ai".to_string(),
        }
    }
}

/// Body of the POST request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeRequest {
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, rename = "forceAI")]
    pub force_ai: Option<bool>,
}

impl RecipeRequest {
    pub fn new(ingredients: Vec<String>) -> Self {
        RecipeRequest {
            ingredients: Some(ingredients),
            force_ai: None,
        }
    }

    pub fn force_ai(mut self) -> Self {
        self.force_ai = Some(true);
        self
    }
}

/// Successful response, tagged with where the recipe came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum RecipeResponse {
    /// One or more stored recipes matched
    Database { recipes: Vec<Recipe> },
    /// A single generated (or fallback) recipe
    Ai { recipe: Recipe },
}
