//! Heading classification and title resolution.
//!
//! A classifier run is a pure function of the line stream and metadata:
//!
//! ```text
//! Line[] -> exclusion rules -> strategy (style | font-rank | numbering)
//!         -> dedup -> title
//! ```
//!
//! The strategy is pluggable through [`HeadingStrategy`]; thresholds and
//! patterns come from [`ClassifierOptions`].

mod dedup;
mod hierarchy;
mod rules;
mod strategy;
mod title;

pub use dedup::{dedup_candidates, overlaps};
pub use hierarchy::{body_font_size, FontHierarchy, LevelScheme};
pub use rules::{
    AlnumRatioRule, BoldRule, CapitalizedRule, Decision, LineRule, MinLengthRule, PatternRule,
    PositionRule, RuleSet, Verdict,
};
pub use strategy::{
    strategy_for, FontRankStrategy, HeadingStrategy, NumberingStrategy, StyleStrategy,
};
pub use title::{ResolvedTitle, TitleResolver};

use crate::error::Result;
use crate::model::{DocumentMetadata, HeadingCandidate, Line};
use crate::options::ClassifierOptions;

/// Output of one classifier run.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Resolved title
    pub title: ResolvedTitle,
    /// Deduplicated candidates in document order
    pub candidates: Vec<HeadingCandidate>,
}

/// Runs exclusion, the heading strategy, dedup, and title resolution.
pub struct HeadingClassifier {
    exclusion: RuleSet,
    strategy: Box<dyn HeadingStrategy>,
    title: TitleResolver,
}

impl HeadingClassifier {
    /// Build a classifier from options.
    ///
    /// Fails with [`crate::Error::InvalidPattern`] when a configured pattern
    /// does not compile.
    pub fn new(options: &ClassifierOptions) -> Result<Self> {
        Ok(Self {
            exclusion: RuleSet::exclusion(options)?,
            strategy: strategy_for(options)?,
            title: TitleResolver::new(options),
        })
    }

    /// Replace the heading strategy.
    pub fn with_strategy(mut self, strategy: Box<dyn HeadingStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Name of the active strategy.
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Lines that survive the exclusion rules.
    pub fn eligible<'a>(&self, lines: &'a [Line]) -> Vec<&'a Line> {
        lines.iter().filter(|l| self.exclusion.accepts(l)).collect()
    }

    /// Classify a document's lines.
    pub fn classify(&self, lines: &[Line], metadata: &DocumentMetadata) -> Classification {
        let eligible = self.eligible(lines);
        log::debug!(
            "Exclusion kept {} of {} lines",
            eligible.len(),
            lines.len()
        );

        let raw = self.strategy.classify(&eligible);
        let raw_count = raw.len();
        let candidates = dedup_candidates(raw);
        log::debug!(
            "Strategy {} produced {} candidates, {} after dedup",
            self.strategy.name(),
            raw_count,
            candidates.len()
        );

        let body_size = body_font_size(lines);
        let title = self
            .title
            .resolve(metadata, &eligible, body_size, &candidates);

        Classification { title, candidates }
    }
}
