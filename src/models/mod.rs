//! Data types for the product catalog and search surface

/// Product records, ingestion metadata, and search projections.
pub mod product;
