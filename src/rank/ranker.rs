//! Persona/task relevance ranking.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::model::{RankedSection, Section};
use crate::options::RankOptions;

use super::embed::{cosine_similarity, Embedder};

/// Join persona and task into one query string.
pub fn build_query(persona: &str, task: &str, separator: &str) -> String {
    format!("{}{}{}", persona.trim(), separator, task.trim())
}

/// Sort sections by score, highest first, and assign 1-based ranks.
///
/// The sort is stable: equal scores keep their input order. `0.0` and
/// `-0.0` compare equal.
pub fn order_by_similarity(sections: Vec<Section>, scores: Vec<f32>) -> Vec<RankedSection> {
    let mut scored: Vec<(Section, f32)> = sections.into_iter().zip(scores).collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .enumerate()
        .map(|(i, (section, similarity))| RankedSection {
            section,
            similarity,
            rank: i + 1,
        })
        .collect()
}

fn embedding_error(err: Error) -> Error {
    match err {
        Error::Embedding(_) => err,
        other => Error::Embedding(other.to_string()),
    }
}

/// Ranks sections against a persona and task.
pub struct RelevanceRanker {
    embedder: Box<dyn Embedder>,
    options: RankOptions,
}

impl RelevanceRanker {
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self {
            embedder,
            options: RankOptions::default(),
        }
    }

    /// Set ranking options.
    pub fn with_options(mut self, options: RankOptions) -> Self {
        self.options = options;
        self
    }

    /// Ranking options in use.
    pub fn options(&self) -> &RankOptions {
        &self.options
    }

    /// Name of the embedding model.
    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    /// Rank every section against the query built from `persona` and `task`.
    ///
    /// Section bodies are embedded in one batch, the query in a second
    /// call. Any embedder failure or contract violation is an
    /// [`Error::Embedding`]. The full ranked list is returned; trimming to
    /// top-K happens in report assembly.
    pub fn rank(
        &self,
        sections: Vec<Section>,
        persona: &str,
        task: &str,
    ) -> Result<Vec<RankedSection>> {
        if sections.is_empty() {
            return Ok(Vec::new());
        }

        let query = build_query(persona, task, &self.options.query_separator);
        let bodies: Vec<String> = sections.iter().map(|s| s.body.clone()).collect();

        let vectors = self.embedder.embed(&bodies).map_err(embedding_error)?;
        if vectors.len() != bodies.len() {
            return Err(Error::Embedding(format!(
                "{} returned {} vectors for {} sections",
                self.embedder.name(),
                vectors.len(),
                bodies.len()
            )));
        }

        let query_vector = self
            .embedder
            .embed(&[query])
            .map_err(embedding_error)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::Embedding(format!("{} returned no query vector", self.embedder.name()))
            })?;

        if let Some(bad) = vectors.iter().find(|v| v.len() != query_vector.len()) {
            return Err(Error::Embedding(format!(
                "dimension mismatch: query has {}, section has {}",
                query_vector.len(),
                bad.len()
            )));
        }

        let scores: Vec<f32> = vectors
            .iter()
            .map(|v| cosine_similarity(&query_vector, v))
            .collect();
        log::debug!(
            "Ranked {} sections with {}",
            sections.len(),
            self.embedder.name()
        );

        Ok(order_by_similarity(sections, scores))
    }
}
