use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to the HTTP caller.
///
/// Only validation failures carry a specific message; everything else is
/// reported as a generic internal error so no detail leaks to the client.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Body missing, not JSON, not an object, or of the wrong shape
    #[error("No data provided")]
    NoData,

    /// `ingredients` missing or empty
    #[error("No ingredients provided")]
    NoIngredients,

    /// Unexpected failure; the detail is logged, never returned
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoData | ApiError::NoIngredients => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            log::error!("API error: {}", detail);
        }
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Failures of the recipe store collaborator
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport failure or non-success status from the store
    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Could not sign the service-account assertion
    #[error("Failed to sign service account token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// Token endpoint answered without a usable access token
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A stored record has a field of the wrong type
    #[error("Malformed record {id}: {reason}")]
    MalformedRecord { id: String, reason: String },
}

/// Failures of the recipe generation call
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Network failure, timeout or non-success status
    #[error("Generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body had no text in its first choice
    #[error("Failed to extract content from response")]
    MissingContent,

    /// No API key configured for the provider
    #[error("API key for {0} is not configured")]
    MissingApiKey(String),
}

/// Errors raised while wiring the service at startup
#[derive(Error, Debug)]
pub enum SetupError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Invalid service-account private key
    #[error("Invalid service account key: {0}")]
    ServiceAccountKey(#[from] jsonwebtoken::errors::Error),

    /// HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
