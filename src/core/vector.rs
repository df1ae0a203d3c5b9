//! Pure vector primitives shared by ingestion and search.

/// L2-normalize a vector into a unit vector.
///
/// The zero vector is returned unchanged rather than dividing by zero; its
/// dot product with anything is 0, so it never clears a positive similarity
/// floor, which is the right degenerate behavior.
pub fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}

/// Dot product of two equal-length vectors.
///
/// For unit vectors this is exactly their cosine similarity.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
