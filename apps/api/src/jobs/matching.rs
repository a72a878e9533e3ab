//! Embedding-based résumé/job similarity.

use crate::agent::{EmbeddingManager, ProviderError};

/// Cosine similarity of two vectors. Mismatched lengths or a zero vector
/// yield 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Embeds both texts concurrently and scores them.
pub async fn similarity(
    embedder: &EmbeddingManager,
    resume_text: &str,
    job_text: &str,
) -> Result<f32, ProviderError> {
    let (resume, job) = tokio::try_join!(embedder.embed(resume_text), embedder.embed(job_text))?;
    Ok(cosine_similarity(&resume, &job))
}
