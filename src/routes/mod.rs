pub mod auth;
pub mod chat;
pub mod generate;
pub mod health;
pub mod image;
pub mod validation;

pub use auth::{login, logout, signup};
pub use chat::chat;
pub use generate::generate;
pub use health::{backend_status, health_check};
pub use image::{analyze_image, upload_image};
pub use validation::ValidJson;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::any::Any;
use std::path::Path;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::constants::MAX_BODY_BYTES;
use crate::middleware::{rate_limit, require_session};
use crate::realtime::socket_handler;
use crate::AppState;

/// Build the full HTTP edge
///
/// Outermost first: CORS, panic handler, tracing, body limit, then routes.
/// `/api/*` is rate limited per IP; generation and image routes also require
/// a session cookie. Unmatched GET requests fall through to the static bundle.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/generate", post(generate))
        .route("/upload-image", post(upload_image))
        .route("/analyze-image", post(analyze_image))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    let api = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/chat", post(chat))
        .route("/backend-status", get(backend_status))
        .route("/ollama-status", get(backend_status))
        .merge(protected)
        .route_layer(from_fn_with_state(state.clone(), rate_limit));

    let expose_details = !state.config.is_production();
    let index_html = Path::new(&state.config.static_dir).join("index.html");

    Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(socket_handler))
        .nest("/api", api)
        .fallback_service(
            ServeDir::new(&state.config.static_dir).fallback(ServeFile::new(index_html)),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(CatchPanicLayer::custom(
            move |err: Box<dyn Any + Send + 'static>| panic_response(err, expose_details),
        ))
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// Request span without the query string
///
/// `/ws?token=...` carries a session token in the query, so only the path is recorded.
fn request_span(request: &Request) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        version = ?request.version(),
    )
}

/// Explicit origin allow-list with credentials enabled
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Last-resort handler: generic 500, panic detail only outside production
fn panic_response(err: Box<dyn Any + Send + 'static>, expose_details: bool) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    tracing::error!("Handler panicked: {}", detail);

    let message = if expose_details {
        detail
    } else {
        "Something went wrong".to_string()
    };

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal Server Error",
            "message": message,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_response_hides_detail_in_production() {
        let response = panic_response(Box::new("boom".to_string()), false);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_panic_response_exposes_detail_in_development() {
        use http_body_util::BodyExt;

        let response = panic_response(Box::new("boom"), true);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(body["message"], "boom");
    }
}
