//! Heading strategies.

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{to_tenths, HeadingCandidate, HeadingLevel, Line};
use crate::options::{ClassifierOptions, NamedPattern, StrategyKind};

use super::hierarchy::{body_font_size, FontHierarchy, LevelScheme};
use super::rules::RuleSet;

/// Decides which lines are headings and at what level.
///
/// Implementations receive the lines that survived exclusion, in document
/// order, and return candidates in the same order.
pub trait HeadingStrategy: Send + Sync {
    /// Strategy name, used in logs.
    fn name(&self) -> &'static str;

    /// Pick heading candidates out of `lines`.
    fn classify(&self, lines: &[&Line]) -> Vec<HeadingCandidate>;
}

/// Build the strategy selected in `options`.
pub fn strategy_for(options: &ClassifierOptions) -> Result<Box<dyn HeadingStrategy>> {
    Ok(match options.strategy {
        StrategyKind::Style => Box::new(StyleStrategy::new(options)?),
        StrategyKind::FontRank => Box::new(FontRankStrategy::new(options)),
        StrategyKind::Numbering => Box::new(NumberingStrategy::new(options)?),
    })
}

fn candidate(line: &Line, level: HeadingLevel) -> HeadingCandidate {
    HeadingCandidate {
        text: line.text.clone(),
        level,
        page: line.page,
        y: line.y,
        font_size: line.font_size,
    }
}

/// Bold, normally spaced, left-aligned or centered lines, levelled by the
/// rank of their size among qualifying lines. The largest size is H1.
pub struct StyleStrategy {
    rules: RuleSet,
    suppress_single_size: bool,
}

impl StyleStrategy {
    /// Build from classifier options.
    pub fn new(options: &ClassifierOptions) -> Result<Self> {
        Ok(Self {
            rules: RuleSet::style(options)?,
            suppress_single_size: options.suppress_single_size,
        })
    }

    /// Build from an explicit rule set.
    pub fn with_rules(rules: RuleSet, suppress_single_size: bool) -> Self {
        Self {
            rules,
            suppress_single_size,
        }
    }
}

impl HeadingStrategy for StyleStrategy {
    fn name(&self) -> &'static str {
        "style"
    }

    fn classify(&self, lines: &[&Line]) -> Vec<HeadingCandidate> {
        let qualifying: Vec<&Line> = lines
            .iter()
            .copied()
            .filter(|line| {
                let decision = self.rules.evaluate(line);
                if !decision.accepted {
                    log::trace!(
                        "Rejected {:?} (page {}) by {}",
                        line.text,
                        line.page,
                        decision.decided_by.unwrap_or("-")
                    );
                }
                decision.accepted
            })
            .collect();

        let hierarchy =
            FontHierarchy::from_lines(qualifying.iter().copied(), LevelScheme::HeadingsOnly);
        if self.suppress_single_size && !hierarchy.is_differentiated() {
            log::debug!(
                "{} qualifying lines share one size; no headings",
                qualifying.len()
            );
            return Vec::new();
        }

        qualifying
            .into_iter()
            .filter_map(|line| {
                hierarchy
                    .level_for(line.font_size)
                    .map(|level| candidate(line, level))
            })
            .collect()
    }
}

/// Every line ranked by size; the largest size is TITLE, the next H1.
///
/// Lines at or below the most common size are body text. Remaining lines
/// must pass the fragment rules.
pub struct FontRankStrategy {
    fragment: RuleSet,
    suppress_single_size: bool,
}

impl FontRankStrategy {
    /// Build from classifier options.
    pub fn new(options: &ClassifierOptions) -> Self {
        Self {
            fragment: RuleSet::fragment(options),
            suppress_single_size: options.suppress_single_size,
        }
    }
}

impl HeadingStrategy for FontRankStrategy {
    fn name(&self) -> &'static str {
        "font-rank"
    }

    fn classify(&self, lines: &[&Line]) -> Vec<HeadingCandidate> {
        let hierarchy = FontHierarchy::from_lines(lines.iter().copied(), LevelScheme::TitleFirst);
        if self.suppress_single_size && !hierarchy.is_differentiated() {
            return Vec::new();
        }
        let Some(body) = body_font_size(lines.iter().copied()) else {
            return Vec::new();
        };
        let body_key = to_tenths(body);

        lines
            .iter()
            .copied()
            .filter(|line| line.size_key() > body_key && self.fragment.accepts(line))
            .filter_map(|line| {
                hierarchy
                    .level_for(line.font_size)
                    .map(|level| candidate(line, level))
            })
            .collect()
    }
}

/// Lines that open with section numbering, levelled by which numbering
/// pattern they match. Font size and weight play no part.
///
/// The pattern at index `n` marks H(n+1). A line matching several
/// patterns takes the deepest level. Matches must pass the fragment rules.
pub struct NumberingStrategy {
    levels: Vec<(HeadingLevel, Regex)>,
    fragment: RuleSet,
}

impl NumberingStrategy {
    /// Build from classifier options.
    ///
    /// Fails with [`Error::InvalidPattern`] when a numbering pattern does
    /// not compile.
    pub fn new(options: &ClassifierOptions) -> Result<Self> {
        Ok(Self {
            levels: compile_levels(&options.numbering_patterns)?,
            fragment: RuleSet::fragment(options),
        })
    }

    /// Level of the deepest pattern matching `text`.
    pub fn level_of(&self, text: &str) -> Option<HeadingLevel> {
        self.levels
            .iter()
            .rev()
            .find(|(_, re)| re.is_match(text))
            .map(|(level, _)| *level)
    }
}

fn compile_levels(patterns: &[NamedPattern]) -> Result<Vec<(HeadingLevel, Regex)>> {
    patterns
        .iter()
        .zip(1..=u8::MAX)
        .map(|(p, depth)| {
            Regex::new(&p.pattern)
                .map(|re| (HeadingLevel::Heading(depth), re))
                .map_err(|source| Error::InvalidPattern {
                    name: p.name.clone(),
                    source,
                })
        })
        .collect()
}

impl HeadingStrategy for NumberingStrategy {
    fn name(&self) -> &'static str {
        "numbering"
    }

    fn classify(&self, lines: &[&Line]) -> Vec<HeadingCandidate> {
        lines
            .iter()
            .copied()
            .filter_map(|line| {
                let level = self.level_of(line.text.trim())?;
                self.fragment
                    .accepts(line)
                    .then(|| candidate(line, level))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn line(text: &str, size: f32, bold: bool, y: f32) -> Line {
        Line {
            text: text.to_string(),
            font_size: size,
            is_bold: bold,
            all_bold: bold,
            y,
            bbox: BoundingBox::new(72.0, y, 300.0, y + size),
            page: 1,
            page_width: 612.0,
            span_count: 1,
        }
    }

    fn levels(candidates: &[HeadingCandidate]) -> Vec<(String, String)> {
        candidates
            .iter()
            .map(|c| (c.level.to_string(), c.text.clone()))
            .collect()
    }

    #[test]
    fn test_style_levels_by_size() {
        let lines = vec![
            line("Introduction", 18.0, true, 72.0),
            line("Some body text here.", 11.0, false, 100.0),
            line("Background", 14.0, true, 130.0),
            line("Scope", 18.0, true, 160.0),
        ];
        let refs: Vec<&Line> = lines.iter().collect();
        let strategy = StyleStrategy::new(&ClassifierOptions::default()).unwrap();
        let out = strategy.classify(&refs);
        assert_eq!(
            levels(&out),
            vec![
                ("H1".to_string(), "Introduction".to_string()),
                ("H2".to_string(), "Background".to_string()),
                ("H1".to_string(), "Scope".to_string()),
            ]
        );
    }

    #[test]
    fn test_style_single_size_suppressed() {
        let lines = vec![
            line("Alpha Section", 14.0, true, 72.0),
            line("Beta Section", 14.0, true, 120.0),
        ];
        let refs: Vec<&Line> = lines.iter().collect();

        let strategy = StyleStrategy::new(&ClassifierOptions::default()).unwrap();
        assert!(strategy.classify(&refs).is_empty());

        let options = ClassifierOptions::default().with_single_size_suppression(false);
        let strategy = StyleStrategy::new(&options).unwrap();
        assert_eq!(strategy.classify(&refs).len(), 2);
    }

    #[test]
    fn test_font_rank_title_level() {
        let lines = vec![
            line("Annual Report", 24.0, false, 50.0),
            line("Overview", 16.0, false, 100.0),
            line("Body one.", 11.0, false, 130.0),
            line("Body two.", 11.0, false, 145.0),
            line("Details", 13.0, false, 170.0),
            line("Body three.", 11.0, false, 190.0),
            line("fine print", 8.0, false, 700.0),
        ];
        let refs: Vec<&Line> = lines.iter().collect();
        let out = FontRankStrategy::new(&ClassifierOptions::default()).classify(&refs);
        assert_eq!(
            levels(&out),
            vec![
                ("TITLE".to_string(), "Annual Report".to_string()),
                ("H1".to_string(), "Overview".to_string()),
                ("H2".to_string(), "Details".to_string()),
            ]
        );
    }

    #[test]
    fn test_strategy_for_kind() {
        let options = ClassifierOptions::default();
        assert_eq!(strategy_for(&options).unwrap().name(), "style");
        let options = options.with_strategy(StrategyKind::FontRank);
        assert_eq!(strategy_for(&options).unwrap().name(), "font-rank");
        let options = options.with_strategy(StrategyKind::Numbering);
        assert_eq!(strategy_for(&options).unwrap().name(), "numbering");
    }

    #[test]
    fn test_numbering_levels_by_depth() {
        let lines = vec![
            line("1 Overview", 11.0, false, 72.0),
            line("Plain body text.", 11.0, false, 90.0),
            line("1.1 Scope of Work", 11.0, false, 110.0),
            line("1.1.1 Definitions", 11.0, true, 130.0),
            line("2. Method", 14.0, true, 160.0),
            line("3 cups of flour", 11.0, false, 190.0),
        ];
        let refs: Vec<&Line> = lines.iter().collect();
        let strategy = NumberingStrategy::new(&ClassifierOptions::default()).unwrap();
        assert_eq!(
            levels(&strategy.classify(&refs)),
            vec![
                ("H1".to_string(), "1 Overview".to_string()),
                ("H2".to_string(), "1.1 Scope of Work".to_string()),
                ("H3".to_string(), "1.1.1 Definitions".to_string()),
                ("H1".to_string(), "2. Method".to_string()),
                ("H1".to_string(), "3 cups of flour".to_string()),
            ]
        );
    }

    #[test]
    fn test_numbering_custom_patterns() {
        let options = ClassifierOptions::default().with_numbering_patterns(vec![
            NamedPattern::new("chapter", r"^Chapter \d+"),
            NamedPattern::new("appendix", r"^Appendix [A-Z]"),
        ]);
        let strategy = NumberingStrategy::new(&options).unwrap();
        assert_eq!(strategy.level_of("Chapter 3 Results"), Some(HeadingLevel::Heading(1)));
        assert_eq!(strategy.level_of("Appendix B Tables"), Some(HeadingLevel::Heading(2)));
        assert_eq!(strategy.level_of("1.2 Terms"), None);
    }

    #[test]
    fn test_numbering_invalid_pattern() {
        let options = ClassifierOptions::default()
            .with_numbering_patterns(vec![NamedPattern::new("broken", "(")]);
        assert!(matches!(
            NumberingStrategy::new(&options),
            Err(Error::InvalidPattern { name, .. }) if name == "broken"
        ));
    }
}
