#![doc(html_root_url = "https://docs.rs/matchlens/0.1.0")]
#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

//! # MatchLens
//!
//! A Rust library and service for visual product matching: submit an image
//! (upload or URL) and retrieve the most visually similar products from a
//! catalog, ranked by cosine similarity of pretrained image embeddings.
//!
//! ## Features
//!
//! - **Embeddings**: fixed-length semantic vectors from a pretrained
//!   vision encoder (CLIP ViT-B/32 TorchScript export via `tch`)
//! - **Catalog**: durable append-only store of product records with
//!   precomputed unit-norm embeddings
//! - **Ranking**: cosine-similarity scoring with category filter,
//!   similarity floor, and result limit
//! - **Ingestion**: single and best-effort bulk ingestion with per-item
//!   outcomes
//! - **Web API**: HTTP server with catalog, search, and seeding endpoints
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! matchlens = { version = "0.1", features = ["full"] }
//! ```
//!
//! Basic usage:
//! ```rust,no_run
//! use matchlens::core::ranker::{rank, SearchOptions};
//! use matchlens::core::vector::l2_normalize;
//!
//! let query = l2_normalize(&[0.3, 0.4, 0.5]);
//! let results = rank(&query, &[], &SearchOptions::default()).unwrap();
//! assert!(results.is_empty());
//! ```

// Internal modules
pub mod api;
/// Durable product catalog store.
pub mod catalog;
pub mod core;
/// Defines the application's error types and result aliases.
pub mod error;
pub mod models;
/// Built-in sample catalog for seeding.
pub mod seed;
mod state;

// Public API exports
pub use crate::{
    catalog::CatalogStore,
    core::pipeline::{IngestOutcome, ProductMatcher},
    core::ranker::{rank, SearchOptions, DEFAULT_LIMIT, DEFAULT_MIN_SIMILARITY},
    core::vector::{dot, l2_normalize},
    error::{AppError, Result, ResultExt},
    models::product::{
        ImageSource, ProductCreate, ProductRecord, SearchResult, EMBEDDING_DIM,
    },
    state::{AppState, Config},
};

#[cfg(feature = "web")]
pub use crate::api::{
    create_router, health_check,
    handlers::{
        create_product, list_categories, list_products, search_by_upload, search_by_url,
        seed_products, service_info, UrlSearchForm,
    },
};

pub use crate::core::embeddings::ImageEncoder;

#[cfg(feature = "embeddings")]
pub use crate::core::embeddings::ClipEncoder;

/// Initialize the application with default settings
///
/// This function sets up logging. It should be called early in the
/// application startup process.
///
/// # Errors
///
/// Returns an error if logging initialization fails.
///
/// # Example
///
/// ```no_run
/// use matchlens::init;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     init()?;
///     // Application code here
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    let env = env_logger::Env::default()
        .default_filter_or("info")
        .default_write_style_or("auto");

    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .format_module_path(false)
        .format_target(false)
        .init();

    log::info!("Initializing MatchLens");
    Ok(())
}
