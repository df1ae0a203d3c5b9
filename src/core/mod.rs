//! Core functionality for embedding-based product matching

/// Produces deep learning embeddings for images.
pub mod embeddings;
/// Resolves query and ingestion images from bytes or URLs.
pub mod fetch;
/// Orchestrates ingestion and search over the catalog.
pub mod pipeline;
/// Scores, filters, and ranks catalog candidates against a query vector.
pub mod ranker;
/// Vector normalization and similarity primitives.
pub mod vector;
