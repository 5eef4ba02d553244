use std::any::Any;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use log::{debug, info};
use serde_json::Value;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::error::ApiError;
use crate::model::{RecipeRequest, RecipeResponse};
use crate::service::RecipeService;

/// Build the router serving `POST /`.
///
/// Any origin may call the endpoint. A panic while handling a request is
/// turned into the generic internal-error response.
pub fn router(service: RecipeService) -> Router {
    Router::new()
        .route("/", post(handle_recipe_request))
        .with_state(Arc::new(service))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
}

async fn handle_recipe_request(
    State(service): State<Arc<RecipeService>>,
    body: Bytes,
) -> Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(e) => {
            info!("Rejected request: {}", e);
            return e.into_response();
        }
    };

    match service.handle(request).await {
        Ok(response) => {
            match &response {
                RecipeResponse::Database { recipes } => {
                    info!("Responding with {} stored recipe(s)", recipes.len())
                }
                RecipeResponse::Ai { recipe } => {
                    info!("Responding with generated recipe '{}'", recipe.title)
                }
            }
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            info!("Rejected request: {}", e);
            e.into_response()
        }
    }
}

/// Validate the raw body.
///
/// Anything that is not a non-empty JSON object whose fields have the
/// expected types is reported as missing data; the ingredient list itself
/// is checked by the service.
pub fn parse_request(body: &[u8]) -> Result<RecipeRequest, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        debug!("Unparseable body: {}", e);
        ApiError::NoData
    })?;

    match &value {
        Value::Object(fields) if !fields.is_empty() => {}
        _ => return Err(ApiError::NoData),
    }

    serde_json::from_value(value).map_err(|e| {
        debug!("Body has unexpected shape: {}", e);
        ApiError::NoData
    })
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_valid() {
        let request = parse_request(br#"{"ingredients": ["Egg"], "forceAI": true}"#).unwrap();
        assert_eq!(request.ingredients, Some(vec!["Egg".to_string()]));
        assert_eq!(request.force_ai, Some(true));
    }

    #[test]
    fn test_parse_request_force_ai_optional() {
        let request = parse_request(br#"{"ingredients": ["egg"]}"#).unwrap();
        assert_eq!(request.force_ai, None);
    }

    #[test]
    fn test_parse_request_no_data() {
        for body in [
            &b""[..],
            b"not json",
            b"null",
            b"{}",
            b"[]",
            b"[\"egg\"]",
            b"42",
            br#"{"ingredients": "egg"}"#,
            br#"{"ingredients": [1, 2]}"#,
            br#"{"ingredients": ["egg"], "forceAI": "yes"}"#,
        ] {
            assert!(
                matches!(parse_request(body), Err(ApiError::NoData)),
                "body {:?} should be rejected",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_parse_request_missing_ingredients_is_not_no_data() {
        let request = parse_request(br#"{"forceAI": false}"#).unwrap();
        assert_eq!(request.ingredients, None);

        let request = parse_request(br#"{"ingredients": null}"#).unwrap();
        assert_eq!(request.ingredients, None);
    }

    #[test]
    fn test_panic_response_is_generic() {
        let response = panic_response(Box::new("secret detail"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
