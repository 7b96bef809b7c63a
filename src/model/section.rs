//! Heading-bounded text sections and their ranked form.

use serde::{Deserialize, Serialize};

use super::HeadingLevel;

/// Text owned by one heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Source document identifier (usually the file name)
    pub document: String,
    /// Heading text
    pub heading: String,
    /// Heading level
    pub level: HeadingLevel,
    /// Page the heading sits on (1-indexed)
    pub page: u32,
    /// Body text, bounded in length
    pub body: String,
    /// Whether the body was cut at the configured maximum
    pub truncated: bool,
}

/// A section with its relevance score and rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSection {
    /// The ranked section
    #[serde(flatten)]
    pub section: Section,
    /// Cosine similarity to the query, in [-1, 1]
    pub similarity: f32,
    /// 1-based rank
    pub rank: usize,
}
