//! Pipeline options and configuration.
//!
//! Every heuristic threshold lives here so it can be tuned from a JSON
//! config file without touching classification logic. All option structs
//! deserialize with `#[serde(default)]`, so a config file only needs the
//! keys it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which heading strategy the classifier runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Bold, normally spaced, left-aligned or centered lines, ranked by size
    #[default]
    Style,
    /// Every line ranked by size; the largest size is the title level
    FontRank,
    /// Lines opening with section numbering, levelled by numbering depth
    Numbering,
}

/// How bold a line must be to qualify as a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoldPolicy {
    /// Every span on the line is bold
    #[default]
    All,
    /// Bold spans are a strict majority
    Majority,
}

/// A regex with a name used in logs and errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPattern {
    /// Rule name
    pub name: String,
    /// Regex source
    pub pattern: String,
}

impl NamedPattern {
    /// Create a named pattern.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// Patterns for lines that are never headings: page numbers, running
/// headers and footers, date stamps.
pub fn default_exclusion_patterns() -> Vec<NamedPattern> {
    vec![
        NamedPattern::new("page-number", r"^\s*\d{1,4}\s*$"),
        NamedPattern::new(
            "page-label",
            r"(?i)^\s*(?:page|pg\.?)\s*\d+(?:\s*(?:of|/)\s*\d+)?\s*$",
        ),
        NamedPattern::new("roman-page-number", r"(?i)^\s*[ivx]{1,5}\s*$"),
        NamedPattern::new(
            "numeric-date",
            r"^\s*\d{1,4}[/.\-]\d{1,2}[/.\-]\d{1,4}\s*$",
        ),
        NamedPattern::new(
            "month-date",
            r"(?i)^\s*(?:\d{1,2}\s+)?(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(?:\d{1,2},?\s+)?\d{4}\s*$",
        ),
        NamedPattern::new("copyright", r"(?i)^\s*(?:©|\(c\)|copyright\s)"),
    ]
}

/// Patterns that reveal abnormal character spacing, as produced by table of
/// contents rows and tabular layouts.
pub fn default_spacing_patterns() -> Vec<NamedPattern> {
    vec![
        NamedPattern::new("double-space", r"\s{2,}"),
        NamedPattern::new("spaced-number", r"\w\s{2,}\d|\d\s{2,}\w"),
        NamedPattern::new("dot-leader", r"(?:\.\s*){4,}\d+\s*$"),
    ]
}

/// Section numbering patterns for the numbering strategy, shallowest
/// first: `1 Scope` is H1, `1.2 Terms` is H2, `1.2.3 Notes` is H3.
pub fn default_numbering_patterns() -> Vec<NamedPattern> {
    vec![
        NamedPattern::new("section", r"^\d+\.?\s+\S"),
        NamedPattern::new("subsection", r"^\d+\.\d+\.?\s+\S"),
        NamedPattern::new("subsubsection", r"^\d+\.\d+\.\d+\.?\s+\S"),
    ]
}

/// Options for heading classification and title resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    /// Heading strategy
    pub strategy: StrategyKind,

    /// Boldness requirement for style-strategy candidates
    pub bold_policy: BoldPolicy,

    /// Lines matching any of these are removed before classification
    pub exclusion_patterns: Vec<NamedPattern>,

    /// Lines matching any of these fail the spacing check
    pub spacing_patterns: Vec<NamedPattern>,

    /// Numbering patterns for the numbering strategy; the pattern at
    /// index `n` marks level H(n+1)
    pub numbering_patterns: Vec<NamedPattern>,

    /// A line starting within this fraction of the page width is left-aligned
    pub left_margin_ratio: f32,

    /// Start of the centered band, as a fraction of page width
    pub center_band_start: f32,

    /// End of the centered band, as a fraction of page width
    pub center_band_end: f32,

    /// Shorter candidates are fragments
    pub min_heading_chars: usize,

    /// Minimum share of letters and digits in a candidate
    pub min_alnum_ratio: f32,

    /// Candidates must start with an uppercase letter or a digit
    pub require_capitalized: bool,

    /// Produce no headings when only one distinct size qualifies
    pub suppress_single_size: bool,

    /// Points a first-page line must exceed the body size by to become the title
    pub title_margin: f32,

    /// Minimum title length in characters
    pub title_min_chars: usize,

    /// Maximum title length in characters
    pub title_max_chars: usize,

    /// Title used when nothing else resolves
    pub untitled_text: String,
}

impl ClassifierOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading strategy.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the bold policy.
    pub fn with_bold_policy(mut self, policy: BoldPolicy) -> Self {
        self.bold_policy = policy;
        self
    }

    /// Append an exclusion pattern.
    pub fn with_exclusion(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.exclusion_patterns
            .push(NamedPattern::new(name, pattern));
        self
    }

    /// Replace all exclusion patterns.
    pub fn with_exclusions(mut self, patterns: Vec<NamedPattern>) -> Self {
        self.exclusion_patterns = patterns;
        self
    }

    /// Replace all spacing patterns.
    pub fn with_spacing_patterns(mut self, patterns: Vec<NamedPattern>) -> Self {
        self.spacing_patterns = patterns;
        self
    }

    /// Replace all numbering patterns, shallowest level first.
    pub fn with_numbering_patterns(mut self, patterns: Vec<NamedPattern>) -> Self {
        self.numbering_patterns = patterns;
        self
    }

    /// Set the left margin ratio.
    pub fn with_left_margin(mut self, ratio: f32) -> Self {
        self.left_margin_ratio = ratio;
        self
    }

    /// Set the centered band.
    pub fn with_center_band(mut self, start: f32, end: f32) -> Self {
        self.center_band_start = start;
        self.center_band_end = end;
        self
    }

    /// Set the minimum heading length.
    pub fn with_min_heading_chars(mut self, chars: usize) -> Self {
        self.min_heading_chars = chars;
        self
    }

    /// Enable or disable single-size suppression.
    pub fn with_single_size_suppression(mut self, suppress: bool) -> Self {
        self.suppress_single_size = suppress;
        self
    }

    /// Set the title margin over body size.
    pub fn with_title_margin(mut self, points: f32) -> Self {
        self.title_margin = points;
        self
    }

    /// Set the untitled literal.
    pub fn with_untitled_text(mut self, text: impl Into<String>) -> Self {
        self.untitled_text = text.into();
        self
    }

    /// Check ratios and bounds.
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("left_margin_ratio", self.left_margin_ratio),
            ("center_band_start", self.center_band_start),
            ("center_band_end", self.center_band_end),
            ("min_alnum_ratio", self.min_alnum_ratio),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.center_band_start > self.center_band_end {
            return Err(Error::Config(format!(
                "center band is inverted: {} > {}",
                self.center_band_start, self.center_band_end
            )));
        }
        if self.title_min_chars > self.title_max_chars {
            return Err(Error::Config(format!(
                "title length bounds are inverted: {} > {}",
                self.title_min_chars, self.title_max_chars
            )));
        }
        if self.numbering_patterns.len() > u8::MAX as usize {
            return Err(Error::Config(format!(
                "at most {} numbering patterns are supported, got {}",
                u8::MAX,
                self.numbering_patterns.len()
            )));
        }
        if !self.title_margin.is_finite() {
            return Err(Error::Config("title_margin must be finite".to_string()));
        }
        Ok(())
    }
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Style,
            bold_policy: BoldPolicy::All,
            exclusion_patterns: default_exclusion_patterns(),
            spacing_patterns: default_spacing_patterns(),
            numbering_patterns: default_numbering_patterns(),
            left_margin_ratio: 0.15,
            center_band_start: 0.3,
            center_band_end: 0.7,
            min_heading_chars: 4,
            min_alnum_ratio: 0.5,
            require_capitalized: true,
            suppress_single_size: true,
            title_margin: 2.0,
            title_min_chars: 5,
            title_max_chars: 200,
            untitled_text: "Untitled Document".to_string(),
        }
    }
}

/// Options for section segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentOptions {
    /// Maximum body length in characters
    pub max_body_chars: usize,

    /// Appended to a truncated body
    pub ellipsis: String,
}

impl SegmentOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum body length.
    pub fn with_max_body_chars(mut self, chars: usize) -> Self {
        self.max_body_chars = chars;
        self
    }

    /// Set the truncation marker.
    pub fn with_ellipsis(mut self, marker: impl Into<String>) -> Self {
        self.ellipsis = marker.into();
        self
    }

    /// Check bounds.
    pub fn validate(&self) -> Result<()> {
        if self.max_body_chars == 0 {
            return Err(Error::Config(
                "max_body_chars must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            max_body_chars: 4000,
            ellipsis: "...".to_string(),
        }
    }
}

/// Options for relevance ranking and report assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankOptions {
    /// Joins persona and task into one query
    pub query_separator: String,

    /// Sections kept in the persona report
    pub top_k: usize,
}

impl RankOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report size.
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Set the query separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.query_separator = separator.into();
        self
    }
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            query_separator: ". ".to_string(),
            top_k: 10,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Classification options
    pub classifier: ClassifierOptions,

    /// Segmentation options
    pub segment: SegmentOptions,

    /// Ranking options
    pub rank: RankOptions,

    /// Process documents of a batch in parallel
    pub parallel: bool,
}

impl PipelineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid config JSON: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Set classifier options.
    pub fn with_classifier(mut self, classifier: ClassifierOptions) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set segmentation options.
    pub fn with_segment(mut self, segment: SegmentOptions) -> Self {
        self.segment = segment;
        self
    }

    /// Set ranking options.
    pub fn with_rank(mut self, rank: RankOptions) -> Self {
        self.rank = rank;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Validate every nested option set.
    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()?;
        self.segment.validate()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            classifier: ClassifierOptions::default(),
            segment: SegmentOptions::default(),
            rank: RankOptions::default(),
            parallel: true,
        }
    }
}
