use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};

use crate::store::ServiceAccount;

/// Application configuration
///
/// Keys are flat so the deployment's existing environment variable names
/// (`FIREBASE_PROJECT_ID`, `TOGETHER_API_KEY`, `SAVE_AI_RECIPES`, ...) map
/// onto fields directly.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Firestore project id
    pub firebase_project_id: Option<String>,
    /// Service-account key id, sent as the JWT `kid`
    pub firebase_private_key_id: Option<String>,
    /// PEM private key; `\n` escapes are unescaped when building the account
    pub firebase_private_key: Option<String>,
    /// Service-account email
    pub firebase_client_email: Option<String>,
    pub firebase_client_id: Option<String>,
    pub firebase_cert_url: Option<String>,
    /// OAuth token endpoint
    #[serde(default = "default_token_uri")]
    pub firebase_token_uri: String,
    /// Firestore REST base URL
    #[serde(default = "default_firestore_base_url")]
    pub firestore_base_url: String,
    /// Collection holding the recipes
    #[serde(default = "default_collection")]
    pub recipes_collection: String,

    /// API key for the generation endpoint
    pub together_api_key: Option<String>,
    /// Base URL of the chat-completion API
    #[serde(default = "default_together_api_url")]
    pub together_api_url: String,
    /// Model used for generation
    #[serde(default = "default_together_model")]
    pub together_model: String,

    /// Write AI-generated recipes back to the store; only `true` (any case)
    /// switches it on
    #[serde(default, deserialize_with = "deserialize_toggle")]
    pub save_ai_recipes: bool,
    /// Timeout for outbound HTTP requests in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Address the server listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

// Default value functions
fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_firestore_base_url() -> String {
    "https://firestore.googleapis.com".to_string()
}

fn default_collection() -> String {
    "recipes".to_string()
}

fn default_together_api_url() -> String {
    "https://api.together.xyz".to_string()
}

fn default_together_model() -> String {
    "meta-llama/Llama-3-8B-Instruct-Turbo".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_bind_address() -> String {
    "0.0.0.0:8888".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Toggle {
    Bool(bool),
    Text(String),
}

fn deserialize_toggle<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Toggle::deserialize(deserializer)? {
        Toggle::Bool(value) => value,
        Toggle::Text(text) => text.trim().eq_ignore_ascii_case("true"),
    })
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (e.g. TOGETHER_API_KEY, SAVE_AI_RECIPES)
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment values stay strings so numeric-looking credentials such as
    /// `FIREBASE_CLIENT_ID` are kept verbatim.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(Environment::default())
    }

    fn from_sources(environment: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            .add_source(environment)
            .build()?;

        Self::from_settings(settings)
    }

    /// Deserialize from already-built settings
    pub fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        settings.try_deserialize()
    }

    /// Service-account credentials, if every required field is present
    pub fn service_account(&self) -> Option<ServiceAccount> {
        Some(ServiceAccount {
            project_id: non_empty(&self.firebase_project_id)?,
            private_key_id: non_empty(&self.firebase_private_key_id)?,
            private_key: non_empty(&self.firebase_private_key)?.replace("\\n", "\n"),
            client_email: non_empty(&self.firebase_client_email)?,
            client_id: self.firebase_client_id.clone(),
            client_x509_cert_url: self.firebase_cert_url.clone(),
            token_uri: self.firebase_token_uri.clone(),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.trim().is_empty()).map(String::from)
}
