use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{NewRecipe, StoredRecord};
use crate::store::RecipeStore;

/// A stored record plus the metadata written alongside it
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    pub record: StoredRecord,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// In-process recipe store. Used when no Firestore credentials are configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Vec<MemoryEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store; records keep the given order
    pub fn with_records(records: Vec<StoredRecord>) -> Self {
        let now = Utc::now();
        let entries = records
            .into_iter()
            .map(|record| MemoryEntry {
                record,
                source: None,
                created_at: now,
            })
            .collect();
        MemoryStore {
            entries: RwLock::new(entries),
        }
    }

    pub async fn entries(&self) -> Vec<MemoryEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    fn store_name(&self) -> &str {
        "memory"
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .map(|entry| entry.record.clone())
            .collect())
    }

    async fn add(&self, recipe: &NewRecipe) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        let entry = MemoryEntry {
            record: StoredRecord {
                id: id.clone(),
                title: Some(recipe.title.clone()),
                description: Some(recipe.description.clone()),
                ingredients: recipe.ingredients.clone(),
                instructions: recipe.instructions.clone(),
            },
            source: Some(recipe.source.clone()),
            created_at: Utc::now(),
        };
        self.entries.write().await.push(entry);
        Ok(id)
    }
}
