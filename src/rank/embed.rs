//! Embedding collaborator interface and the bundled hashing embedder.

use xxhash_rust::xxh3::xxh3_64;

use crate::error::Result;

/// Turns text into fixed-dimension vectors.
///
/// One call embeds one batch; the output has one vector per input, in
/// input order. Every vector an embedder returns has the same dimension.
pub trait Embedder: Send + Sync {
    /// Model name, used in logs.
    fn name(&self) -> &str;

    /// Embed a batch of texts.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Default vector dimension of [`HashingEmbedder`].
pub const DEFAULT_DIMENSIONS: usize = 1024;

/// Lowercased alphanumeric word tokens of two or more characters.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_lowercase)
}

/// Deterministic lexical embedder.
///
/// Tokens are hashed into a fixed number of buckets with xxh3, weighted
/// by term frequency, and the vector is L2-normalized. Texts sharing
/// vocabulary score high; there is no notion of synonyms.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vector dimension (at least 1).
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions.max(1);
        self
    }

    /// Vector dimension.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embed a single text.
    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in tokenize(text) {
            let bucket = (xxh3_64(token.as_bytes()) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
        }
    }
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing-tf"
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// Cosine similarity of two vectors, clamped to [-1, 1].
///
/// Empty, zero-norm, or mismatched vectors score 0.0. Orthogonal vectors
/// score positive zero, never `-0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a * norm_b);
    if similarity.is_finite() {
        // Adding +0.0 folds -0.0 into +0.0
        similarity.clamp(-1.0, 1.0) + 0.0
    } else {
        0.0
    }
}
