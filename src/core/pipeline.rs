//! Ingestion and query pipelines tying the encoder, normalizer, and catalog
//! together.

use std::sync::Arc;

use image::DynamicImage;
use serde::Serialize;

use crate::catalog::CatalogStore;
use crate::core::embeddings::ImageEncoder;
use crate::core::fetch::resolve_image;
use crate::core::ranker::{rank, SearchOptions};
use crate::core::vector::l2_normalize;
use crate::error::{AppError, Result};
use crate::models::product::{ImageSource, ProductCreate, ProductRecord, SearchResult};

/// Per-item outcome of a bulk ingestion; one bad image never aborts the
/// rest of the batch.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// The item was embedded and stored.
    Stored {
        /// The persisted record.
        record: ProductRecord,
    },
    /// The item failed; the catalog is unchanged for it.
    Failed {
        /// Name from the item's metadata, for reporting.
        name: String,
        /// Human-readable failure reason.
        reason: String,
    },
}

/// The similarity-search core: shares one encoder handle, one HTTP client,
/// and one catalog across all concurrent requests.
///
/// The encoder is `None` when model initialization failed at startup; in
/// that degraded mode catalog browsing keeps working while ingestion and
/// search fail with `EncodingUnavailable`.
pub struct ProductMatcher {
    encoder: Option<Arc<dyn ImageEncoder>>,
    client: reqwest::Client,
    catalog: Arc<CatalogStore>,
    seed_lock: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for ProductMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductMatcher")
            .field("encoder_available", &self.encoder.is_some())
            .field("catalog", &self.catalog)
            .finish()
    }
}

impl ProductMatcher {
    /// Wire up the pipelines with their collaborators.
    pub fn new(
        encoder: Option<Arc<dyn ImageEncoder>>,
        client: reqwest::Client,
        catalog: Arc<CatalogStore>,
    ) -> Self {
        Self {
            encoder,
            client,
            catalog,
            seed_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Whether the embedding model loaded and search is serviceable.
    pub fn encoder_available(&self) -> bool {
        self.encoder.is_some()
    }

    /// The shared catalog store.
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Resolve, embed, and store a single product.
    ///
    /// Any failure surfaces as a typed error and leaves the catalog
    /// unchanged.
    pub async fn ingest(
        &self,
        source: ImageSource,
        metadata: ProductCreate,
    ) -> Result<ProductRecord> {
        self.require_encoder()?;
        let image = resolve_image(&self.client, &source).await?;
        let embedding = self.embed(image).await?;
        let record = self.catalog.insert(metadata.into_record(embedding)).await?;
        log::info!("Ingested product {} ({})", record.name, record.id);
        Ok(record)
    }

    /// Ingest each item independently, in order, capturing per-item
    /// outcomes instead of aborting on the first failure.
    pub async fn bulk_ingest(
        &self,
        items: Vec<(ImageSource, ProductCreate)>,
    ) -> Vec<IngestOutcome> {
        let mut outcomes = Vec::with_capacity(items.len());
        for (source, metadata) in items {
            let name = metadata.name.clone();
            match self.ingest(source, metadata).await {
                Ok(record) => outcomes.push(IngestOutcome::Stored { record }),
                Err(e) => {
                    log::warn!("Failed to ingest {}: {}", name, e);
                    outcomes.push(IngestOutcome::Failed {
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }
        outcomes
    }

    /// Seed the catalog with `items` when, and only when, it is empty.
    ///
    /// Returns `None` if the catalog already has records. The emptiness
    /// check and the ingestion run under one lock, so two concurrent seed
    /// requests cannot both see an empty catalog and double-ingest; the
    /// lock is private to seeding and never blocks searches or ordinary
    /// ingestion.
    pub async fn seed_if_empty(
        &self,
        items: Vec<(ImageSource, ProductCreate)>,
    ) -> Option<Vec<IngestOutcome>> {
        let _guard = self.seed_lock.lock().await;
        if self.catalog.count().await > 0 {
            return None;
        }
        Some(self.bulk_ingest(items).await)
    }

    /// Answer one similarity query: embed the query image, snapshot the
    /// catalog, and return the ranked, filtered, limited results with raw
    /// embeddings stripped.
    pub async fn search(
        &self,
        source: ImageSource,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        // Parameter errors and a missing encoder are cheap to report
        // before touching the image.
        options.validate()?;
        self.require_encoder()?;

        let image = resolve_image(&self.client, &source).await?;
        let query = self.embed(image).await?;
        let candidates = self.catalog.list_all().await;
        rank(&query, &candidates, options)
    }

    fn require_encoder(&self) -> Result<Arc<dyn ImageEncoder>> {
        self.encoder.clone().ok_or_else(|| {
            AppError::EncodingUnavailable("embedding model is not loaded".to_string())
        })
    }

    /// Encode on a blocking thread (inference is CPU/GPU bound) and
    /// L2-normalize the result. No lock is held across the call.
    async fn embed(&self, image: DynamicImage) -> Result<Vec<f32>> {
        let encoder = self.require_encoder()?;
        let raw = tokio::task::spawn_blocking(move || encoder.encode(&image)).await??;
        Ok(l2_normalize(&raw))
    }
}
