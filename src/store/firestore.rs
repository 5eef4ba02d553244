//! Firestore REST implementation of [`RecipeStore`].
//!
//! Authenticates with a Google service account: a signed RS256 assertion is
//! exchanged for an OAuth access token, which is reused until shortly before
//! it expires.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{SetupError, StoreError};
use crate::model::{NewRecipe, StoredRecord};
use crate::store::RecipeStore;

const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const PAGE_SIZE: &str = "300";

/// Service-account credentials for the Firestore project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccount {
    pub project_id: String,
    pub private_key_id: String,
    /// PEM-encoded private key
    pub private_key: String,
    pub client_email: String,
    pub client_id: Option<String>,
    pub client_x509_cert_url: Option<String>,
    pub token_uri: String,
}

/// Where access tokens come from
pub enum TokenSource {
    /// Sign assertions with the service account's key
    ServiceAccount {
        account: ServiceAccount,
        key: EncodingKey,
    },
    /// A fixed bearer token (emulators, tests)
    Static(String),
}

impl TokenSource {
    pub fn service_account(account: ServiceAccount) -> Result<Self, jsonwebtoken::errors::Error> {
        let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())?;
        Ok(TokenSource::ServiceAccount { account, key })
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

pub struct FirestoreStore {
    client: Client,
    base_url: String,
    project_id: String,
    collection: String,
    tokens: TokenSource,
    cached: Mutex<Option<CachedToken>>,
}

impl FirestoreStore {
    /// Create a store authenticated with the given service account
    pub fn new(config: &AppConfig, account: ServiceAccount) -> Result<Self, SetupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let project_id = account.project_id.clone();

        Ok(FirestoreStore {
            client,
            base_url: config.firestore_base_url.clone(),
            project_id,
            collection: config.recipes_collection.clone(),
            tokens: TokenSource::service_account(account)?,
            cached: Mutex::new(None),
        })
    }

    #[doc(hidden)]
    pub fn with_token_source(
        base_url: String,
        project_id: String,
        collection: String,
        tokens: TokenSource,
    ) -> Self {
        FirestoreStore {
            client: Client::new(),
            base_url,
            project_id,
            collection,
            tokens,
            cached: Mutex::new(None),
        }
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    async fn access_token(&self) -> Result<String, StoreError> {
        let (account, key) = match &self.tokens {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::ServiceAccount { account, key } => (account, key),
        };

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() + ChronoDuration::seconds(60) {
                return Ok(token.value.clone());
            }
        }

        let fresh = self.fetch_token(account, key).await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    async fn fetch_token(
        &self,
        account: &ServiceAccount,
        key: &EncodingKey,
    ) -> Result<CachedToken, StoreError> {
        let now = Utc::now();
        let claims = AssertionClaims {
            iss: &account.client_email,
            scope: DATASTORE_SCOPE,
            aud: &account.token_uri,
            iat: now.timestamp(),
            exp: (now + ChronoDuration::hours(1)).timestamp(),
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(account.private_key_id.clone());
        let assertion = encode(&header, &claims, key)?;

        let response: TokenResponse = self
            .client
            .post(&account.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.access_token.is_empty() {
            return Err(StoreError::Auth("token endpoint returned an empty token".to_string()));
        }

        let expires_at = ChronoDuration::try_seconds(response.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                StoreError::Auth(format!("token lifetime out of range: {}s", response.expires_in))
            })?;

        debug!("Obtained access token for {}", account.client_email);
        Ok(CachedToken {
            value: response.access_token,
            expires_at,
        })
    }
}

#[async_trait]
impl RecipeStore for FirestoreStore {
    fn store_name(&self) -> &str {
        "firestore"
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/v1/{}/{}",
            self.base_url,
            self.database_path(),
            self.collection
        );

        let mut records = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(&token)
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(page) = &page_token {
                request = request.query(&[("pageToken", page)]);
            }

            let page: ListDocumentsResponse =
                request.send().await?.error_for_status()?.json().await?;
            for document in page.documents {
                records.push(decode_document(document)?);
            }

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        debug!("Listed {} record(s) from {}", records.len(), self.collection);
        Ok(records)
    }

    async fn add(&self, recipe: &NewRecipe) -> Result<String, StoreError> {
        let token = self.access_token().await?;
        let id = Uuid::new_v4().simple().to_string();
        let name = format!("{}/{}/{}", self.database_path(), self.collection, id);

        self.client
            .post(format!("{}/v1/{}:commit", self.base_url, self.database_path()))
            .bearer_auth(&token)
            .json(&json!({
                "writes": [{
                    "update": {"name": name, "fields": encode_fields(recipe)},
                    "currentDocument": {"exists": false},
                    "updateTransforms": [
                        {"fieldPath": "created_at", "setToServerValue": "REQUEST_TIME"}
                    ]
                }]
            }))
            .send()
            .await?
            .error_for_status()?;

        Ok(id)
    }
}

fn string_value(value: &str) -> Value {
    json!({ "stringValue": value })
}

fn array_value(values: &[String]) -> Value {
    let values: Vec<Value> = values.iter().map(|v| string_value(v)).collect();
    json!({ "arrayValue": { "values": values } })
}

fn encode_fields(recipe: &NewRecipe) -> Value {
    json!({
        "title": string_value(&recipe.title),
        "description": string_value(&recipe.description),
        "ingredients": array_value(&recipe.ingredients),
        "instructions": array_value(&recipe.instructions),
        "source": string_value(&recipe.source),
    })
}

fn decode_document(document: Document) -> Result<StoredRecord, StoreError> {
    let id = document
        .name
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();
    let fields = &document.fields;

    Ok(StoredRecord {
        title: optional_string(&id, fields, "title")?,
        description: optional_string(&id, fields, "description")?,
        ingredients: string_list(&id, fields, "ingredients")?,
        instructions: string_list(&id, fields, "instructions")?,
        id,
    })
}

fn malformed(id: &str, reason: String) -> StoreError {
    StoreError::MalformedRecord {
        id: id.to_string(),
        reason,
    }
}

fn is_null(value: &Value) -> bool {
    value.get("nullValue").is_some()
}

fn optional_string(
    id: &str,
    fields: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>, StoreError> {
    match fields.get(key) {
        None => Ok(None),
        Some(value) if is_null(value) => Ok(None),
        Some(value) => value
            .get("stringValue")
            .and_then(Value::as_str)
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| malformed(id, format!("field '{}' is not a string", key))),
    }
}

fn string_list(
    id: &str,
    fields: &Map<String, Value>,
    key: &str,
) -> Result<Vec<String>, StoreError> {
    let value = match fields.get(key) {
        None => return Ok(Vec::new()),
        Some(value) if is_null(value) => return Ok(Vec::new()),
        Some(value) => value,
    };

    let array = value
        .get("arrayValue")
        .ok_or_else(|| malformed(id, format!("field '{}' is not an array", key)))?;

    // an empty Firestore array has no "values" key
    let Some(items) = array.get("values").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    items
        .iter()
        .map(|item| {
            item.get("stringValue")
                .and_then(Value::as_str)
                .map(String::from)
                .ok_or_else(|| malformed(id, format!("'{}' contains a non-string item", key)))
        })
        .collect()
}
