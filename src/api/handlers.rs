use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::{
    core::pipeline::IngestOutcome,
    core::ranker::{SearchOptions, DEFAULT_LIMIT, DEFAULT_MIN_SIMILARITY},
    error::{AppError, Result},
    models::product::{ImageSource, ProductCreate},
    seed,
    AppState,
};

use super::responses::ApiResponse;

/// Service banner; reports whether the encoder loaded so clients can show
/// a degraded-service notice.
pub async fn service_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "message": "Visual Product Matcher API",
        "encoder_available": state.matcher.encoder_available(),
    }))
}

/// Create a product: fetch its image, embed it, store the record.
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(metadata): Json<ProductCreate>,
) -> Result<impl IntoResponse> {
    let source = ImageSource::Url(metadata.image_url.clone());
    let record = state.matcher.ingest(source, metadata).await?;
    Ok(ApiResponse::success(record))
}

/// List every catalog record.
pub async fn list_products(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let products = state.matcher.catalog().list_all().await;
    ApiResponse::success(products)
}

/// List distinct categories present in the catalog.
pub async fn list_categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let categories = state.matcher.catalog().list_categories().await;
    ApiResponse::success(json!({ "categories": categories }))
}

/// Search by uploaded image: multipart with a `file` field plus optional
/// `limit`, `min_similarity`, and `category` fields.
pub async fn search_by_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut file = None;
    let mut options = SearchOptions::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => file = Some(field.bytes().await?),
            "limit" => {
                let text = field.text().await?;
                options.limit = text.parse().map_err(|_| {
                    AppError::InvalidParameter(format!("limit must be an integer, got {:?}", text))
                })?;
            }
            "min_similarity" => {
                let text = field.text().await?;
                options.min_similarity = text.parse().map_err(|_| {
                    AppError::InvalidParameter(format!(
                        "min_similarity must be a number, got {:?}",
                        text
                    ))
                })?;
            }
            "category" => {
                let text = field.text().await?;
                if !text.is_empty() {
                    options.category = Some(text);
                }
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::UploadError("no file provided".to_string()))?;
    let results = state
        .matcher
        .search(ImageSource::Bytes(file), &options)
        .await?;
    Ok(ApiResponse::success(results))
}

/// Form body for URL-based search.
#[derive(Debug, Deserialize)]
pub struct UrlSearchForm {
    /// URL of the query image.
    pub url: String,
    /// Maximum number of results, defaults to 10.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Similarity floor, defaults to 0.5.
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,
    /// Exact-match category filter.
    #[serde(default)]
    pub category: Option<String>,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_min_similarity() -> f32 {
    DEFAULT_MIN_SIMILARITY
}

/// Search by image URL.
pub async fn search_by_url(
    State(state): State<Arc<AppState>>,
    Form(form): Form<UrlSearchForm>,
) -> Result<impl IntoResponse> {
    let options = SearchOptions {
        category: form.category.filter(|c| !c.is_empty()),
        min_similarity: form.min_similarity,
        limit: form.limit,
    };
    let results = state
        .matcher
        .search(ImageSource::Url(form.url), &options)
        .await?;
    Ok(ApiResponse::success(results))
}

/// Seed the catalog with the built-in sample products when it is empty.
pub async fn seed_products(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let outcomes = match state.matcher.seed_if_empty(seed::sample_products()).await {
        Some(outcomes) => outcomes,
        None => {
            let count = state.matcher.catalog().count().await;
            return Ok(ApiResponse::success(json!({
                "message": format!("Catalog already contains {} products", count),
                "inserted": 0,
                "failed": 0,
            })));
        }
    };

    let inserted = outcomes
        .iter()
        .filter(|o| matches!(o, IngestOutcome::Stored { .. }))
        .count();
    let failed = outcomes.len() - inserted;

    Ok(ApiResponse::success(json!({
        "message": format!("Seeded {} products successfully", inserted),
        "inserted": inserted,
        "failed": failed,
    })))
}
