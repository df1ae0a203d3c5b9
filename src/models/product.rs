use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed embedding length produced by the reference encoder (CLIP ViT-B/32).
///
/// Every record in the catalog carries exactly this many floats; vectors of
/// any other length are rejected at ingestion.
pub const EMBEDDING_DIM: usize = 512;

/// A catalog entry: product metadata plus its unit-norm image embedding.
///
/// Records are append-only. `id` and `created_at` are assigned once at
/// insert and never change.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProductRecord {
    /// Unique identifier, assigned at creation.
    pub id: String,
    /// Display name, non-empty.
    pub name: String,
    /// Free-text classification, matched exactly by the category filter.
    pub category: String,
    /// Source reference for the product image.
    pub image_url: String,
    /// Optional non-negative price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// L2-normalized embedding of length [`EMBEDDING_DIM`].
    pub embedding: Vec<f32>,
    /// Creation timestamp (RFC 3339 in serialized form).
    pub created_at: DateTime<Utc>,
}

/// Metadata supplied when creating a product; the embedding is computed
/// by the ingestion pipeline from `image_url`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProductCreate {
    /// Display name, non-empty.
    pub name: String,
    /// Free-text classification.
    pub category: String,
    /// URL the product image is fetched from.
    pub image_url: String,
    /// Optional non-negative price.
    #[serde(default)]
    pub price: Option<f64>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductCreate {
    /// Build a full record from this metadata and a normalized embedding.
    pub fn into_record(self, embedding: Vec<f32>) -> ProductRecord {
        ProductRecord {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            category: self.category,
            image_url: self.image_url,
            price: self.price,
            description: self.description,
            embedding,
            created_at: Utc::now(),
        }
    }
}

/// A ranked search hit: the record's metadata without the raw embedding,
/// plus its cosine similarity to the query.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchResult {
    /// Matched record id.
    pub id: String,
    /// Matched record name.
    pub name: String,
    /// Matched record category.
    pub category: String,
    /// Matched record image URL.
    pub image_url: String,
    /// Matched record price, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Matched record description, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cosine similarity to the query, in [-1, 1].
    pub similarity_score: f32,
}

impl SearchResult {
    /// Project a record into a result, stripping the embedding.
    pub fn from_record(record: &ProductRecord, similarity_score: f32) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            category: record.category.clone(),
            image_url: record.image_url.clone(),
            price: record.price,
            description: record.description.clone(),
            similarity_score,
        }
    }
}

/// A query or ingestion image: raw upload bytes or a URL to fetch.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Already-uploaded image bytes.
    Bytes(Bytes),
    /// Remote image fetched over HTTP with a bounded timeout.
    Url(String),
}
