#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use recipe_finder::{
    GenerationError, LlmProvider, MemoryStore, NewRecipe, RecipeStore, StoreError, StoredRecord,
};
use serde_json::Value;
use tower::ServiceExt;

/// Completion text following the prompt's layout exactly
pub const TOFU_COMPLETION: &str = "**Title:** Sticky Soy Tofu

**Description:** Crispy tofu cubes tossed in a glossy soy glaze.

**Ingredients List:**
- 400g firm tofu
- 3 tbsp soy sauce
- 1 tbsp oil

**Instructions:**
1. Press the tofu and cut it into cubes.
2. Fry the tofu in oil until golden on all sides.
3. Pour over the soy sauce and toss until glossy.";

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn record(id: &str, title: &str, ingredients: &[&str]) -> StoredRecord {
    StoredRecord {
        id: id.to_string(),
        title: Some(title.to_string()),
        description: Some(format!("{title} from the collection")),
        ingredients: strings(ingredients),
        instructions: strings(&["Mix", "Cook"]),
    }
}

/// Provider returning a fixed reply and counting calls
pub struct CannedProvider {
    reply: Option<String>,
    pub calls: AtomicUsize,
}

impl CannedProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(CannedProvider {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(CannedProvider {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for CannedProvider {
    fn provider_name(&self) -> &str {
        "canned"
    }

    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().ok_or(GenerationError::MissingContent)
    }
}

/// Wraps a [`MemoryStore`] and counts listings
pub struct CountingStore {
    pub inner: MemoryStore,
    pub lists: AtomicUsize,
}

impl CountingStore {
    pub fn with_records(records: Vec<StoredRecord>) -> Arc<Self> {
        Arc::new(CountingStore {
            inner: MemoryStore::with_records(records),
            lists: AtomicUsize::new(0),
        })
    }

    pub fn list_count(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeStore for CountingStore {
    fn store_name(&self) -> &str {
        "counting"
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner.list_all().await
    }

    async fn add(&self, recipe: &NewRecipe) -> Result<String, StoreError> {
        self.inner.add(recipe).await
    }
}

/// Store where every operation fails
pub struct FailingStore;

#[async_trait]
impl RecipeStore for FailingStore {
    fn store_name(&self) -> &str {
        "failing"
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        Err(StoreError::Auth("connection refused".to_string()))
    }

    async fn add(&self, _recipe: &NewRecipe) -> Result<String, StoreError> {
        Err(StoreError::Auth("connection refused".to_string()))
    }
}

/// Store that lists nothing but refuses writes
pub struct ReadOnlyStore;

#[async_trait]
impl RecipeStore for ReadOnlyStore {
    fn store_name(&self) -> &str {
        "read-only"
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        Ok(Vec::new())
    }

    async fn add(&self, _recipe: &NewRecipe) -> Result<String, StoreError> {
        Err(StoreError::Auth("permission denied".to_string()))
    }
}

/// Store that panics when read
pub struct PanickingStore;

#[async_trait]
impl RecipeStore for PanickingStore {
    fn store_name(&self) -> &str {
        "panicking"
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        panic!("store driver crashed");
    }

    async fn add(&self, _recipe: &NewRecipe) -> Result<String, StoreError> {
        panic!("store driver crashed");
    }
}

/// POST a raw body to `/` and return the status and parsed JSON body
pub async fn post_raw(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

pub async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, &body.to_string()).await
}
