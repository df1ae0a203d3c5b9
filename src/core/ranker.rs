//! Similarity ranking over a catalog snapshot.

use crate::core::vector::dot;
use crate::error::{AppError, Result};
use crate::models::product::{ProductRecord, SearchResult};

/// Default similarity floor when the caller does not supply one.
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.5;
/// Default result count when the caller does not supply one.
pub const DEFAULT_LIMIT: usize = 10;

/// Filter parameters for a single search.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Exact-match category filter, if any.
    pub category: Option<String>,
    /// Minimum cosine similarity a candidate must reach, in [-1, 1].
    pub min_similarity: f32,
    /// Maximum number of results to return, at least 1.
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            category: None,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchOptions {
    /// Reject out-of-range parameters before any work is done.
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(AppError::InvalidParameter(
                "limit must be a positive integer".to_string(),
            ));
        }
        if !(-1.0..=1.0).contains(&self.min_similarity) || self.min_similarity.is_nan() {
            return Err(AppError::InvalidParameter(format!(
                "min_similarity must be in [-1, 1], got {}",
                self.min_similarity
            )));
        }
        Ok(())
    }
}

/// Rank catalog candidates against a unit-norm query vector.
///
/// Scores are plain dot products: both sides are unit vectors, so this is
/// cosine similarity with no re-normalization at query time. Candidates at
/// exactly the floor are kept (`score >= min_similarity`). Ties are broken
/// by ascending `id` so repeated identical queries return identical
/// orderings. An empty catalog yields an empty result, not an error.
pub fn rank(
    query: &[f32],
    candidates: &[ProductRecord],
    options: &SearchOptions,
) -> Result<Vec<SearchResult>> {
    options.validate()?;

    let mut scored: Vec<SearchResult> = candidates
        .iter()
        .filter(|record| match &options.category {
            Some(category) => record.category == *category,
            None => true,
        })
        // The store enforces a fixed dimension, but skip rather than
        // mis-score anything that slipped past it.
        .filter(|record| record.embedding.len() == query.len())
        .map(|record| SearchResult::from_record(record, dot(query, &record.embedding)))
        .filter(|result| result.similarity_score >= options.min_similarity)
        .collect();

    scored.sort_by(|a, b| {
        b.similarity_score
            .total_cmp(&a.similarity_score)
            .then_with(|| a.id.cmp(&b.id))
    });
    scored.truncate(options.limit);

    Ok(scored)
}
