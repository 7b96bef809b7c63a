//! Section relevance ranking.
//!
//! The embedding model sits behind [`Embedder`], so ranking works with the
//! bundled [`HashingEmbedder`], a remote model, or a test stub alike.

mod embed;
mod ranker;

pub use embed::{cosine_similarity, tokenize, Embedder, HashingEmbedder, DEFAULT_DIMENSIONS};
pub use ranker::{build_query, order_by_similarity, RelevanceRanker};
