//! API module for handling HTTP requests and responses

#[cfg(feature = "web")]
pub(crate) mod handlers;
#[cfg(feature = "web")]
pub(crate) mod responses;

#[cfg(feature = "web")]
use axum::{
    routing::{get, post},
    Router,
};
#[cfg(feature = "web")]
use std::sync::Arc;
#[cfg(feature = "web")]
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

#[cfg(feature = "web")]
use crate::state::AppState;

#[cfg(feature = "web")]
pub(crate) use handlers::*;

/// Maximum accepted request body, covering the largest plausible upload.
#[cfg(feature = "web")]
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[cfg(feature = "web")]
/// Create the application router with all routes
pub fn create_router() -> Router<Arc<AppState>> {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/", get(service_info))
        // Public health check, works even when the encoder failed to load
        .route("/api/health", get(health_check))
        // Catalog endpoints
        .route("/api/products", post(create_product).get(list_products))
        .route("/api/products/categories", get(list_categories))
        // Search endpoints
        .route("/api/search/upload", post(search_by_upload))
        .route("/api/search/url", post(search_by_url))
        // Seeding
        .route("/api/seed", post(seed_products))
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(feature = "web")]
/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
