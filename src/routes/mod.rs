use axum::{
    http::{HeaderValue, StatusCode},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod catalog;
pub mod profile;
pub mod state;
pub mod tmdb;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tmdb/*path", get(tmdb::proxy))
        .route("/catalog/movies", get(catalog::movies))
        .route("/catalog/shows", get(catalog::shows))
        .route("/catalog/trending", get(catalog::trending))
        .route("/catalog/movie/:id", get(catalog::movie_detail))
        .route("/catalog/show/:id", get(catalog::show_detail))
        .route("/catalog/search", get(catalog::search))
        .route("/profile", post(profile::upsert_profile))
}

/// CORS policy; an empty origin list allows any origin
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
