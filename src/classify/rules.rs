//! Line predicates evaluated as an ordered, short-circuiting rule set.
//!
//! Each rule looks at one [`Line`] and returns a [`Verdict`]. A rule set
//! stops at the first rule that accepts or rejects; a line nobody rejects
//! is accepted.

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::Line;
use crate::options::{BoldPolicy, ClassifierOptions, NamedPattern};

/// Outcome of one rule on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep the line; skip the remaining rules
    Accept,
    /// Drop the line; skip the remaining rules
    Reject,
    /// No opinion; ask the next rule
    Abstain,
}

/// A named predicate over a line.
pub trait LineRule: Send + Sync {
    /// Rule name, used in logs.
    fn name(&self) -> &str;

    /// Judge one line.
    fn evaluate(&self, line: &Line) -> Verdict;
}

/// Result of running a rule set on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision<'a> {
    /// Whether the line survived
    pub accepted: bool,
    /// Rule that decided, if any rule did
    pub decided_by: Option<&'a str>,
}

/// Ordered rule list.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn LineRule>>,
}

impl RuleSet {
    /// Create an empty rule set (accepts everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    pub fn push(&mut self, rule: Box<dyn LineRule>) {
        self.rules.push(rule);
    }

    /// Builder-style rule append.
    pub fn with_rule(mut self, rule: impl LineRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run the rules in order until one decides.
    pub fn evaluate(&self, line: &Line) -> Decision<'_> {
        for rule in &self.rules {
            match rule.evaluate(line) {
                Verdict::Accept => {
                    return Decision {
                        accepted: true,
                        decided_by: Some(rule.name()),
                    }
                }
                Verdict::Reject => {
                    return Decision {
                        accepted: false,
                        decided_by: Some(rule.name()),
                    }
                }
                Verdict::Abstain => {}
            }
        }
        Decision {
            accepted: true,
            decided_by: None,
        }
    }

    /// Shorthand for `evaluate(line).accepted`.
    pub fn accepts(&self, line: &Line) -> bool {
        self.evaluate(line).accepted
    }

    /// Exclusion rules: page numbers, running headers, date stamps.
    pub fn exclusion(options: &ClassifierOptions) -> Result<Self> {
        Ok(Self::new().with_rule(PatternRule::compile(
            "exclusion",
            &options.exclusion_patterns,
        )?))
    }

    /// Fragment rules: too short, punctuation-heavy, or not capitalized.
    pub fn fragment(options: &ClassifierOptions) -> Self {
        let mut set = Self::new()
            .with_rule(MinLengthRule::new(options.min_heading_chars))
            .with_rule(AlnumRatioRule::new(options.min_alnum_ratio));
        if options.require_capitalized {
            set = set.with_rule(CapitalizedRule);
        }
        set
    }

    /// Style rules followed by fragment rules.
    pub fn style(options: &ClassifierOptions) -> Result<Self> {
        let mut set = Self::new()
            .with_rule(BoldRule::new(options.bold_policy))
            .with_rule(PatternRule::compile("spacing", &options.spacing_patterns)?)
            .with_rule(PositionRule::new(
                options.left_margin_ratio,
                options.center_band_start,
                options.center_band_end,
            ));
        for rule in Self::fragment(options).rules {
            set.push(rule);
        }
        Ok(set)
    }
}

/// Rejects lines matching any of a list of regexes.
pub struct PatternRule {
    name: String,
    patterns: Vec<(String, Regex)>,
}

impl PatternRule {
    /// Compile named patterns into one rule.
    pub fn compile(name: impl Into<String>, patterns: &[NamedPattern]) -> Result<Self> {
        let compiled = patterns
            .iter()
            .map(|p| {
                Regex::new(&p.pattern)
                    .map(|re| (p.name.clone(), re))
                    .map_err(|source| Error::InvalidPattern {
                        name: p.name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: name.into(),
            patterns: compiled,
        })
    }

    /// Name of the first pattern matching `text`.
    pub fn matching_pattern(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(name, _)| name.as_str())
    }
}

impl LineRule for PatternRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, line: &Line) -> Verdict {
        match self.matching_pattern(&line.text) {
            Some(_) => Verdict::Reject,
            None => Verdict::Abstain,
        }
    }
}

/// Requires the line to be bold under the configured policy.
pub struct BoldRule {
    policy: BoldPolicy,
}

impl BoldRule {
    pub fn new(policy: BoldPolicy) -> Self {
        Self { policy }
    }
}

impl LineRule for BoldRule {
    fn name(&self) -> &str {
        "bold"
    }

    fn evaluate(&self, line: &Line) -> Verdict {
        let bold = match self.policy {
            BoldPolicy::All => line.all_bold,
            BoldPolicy::Majority => line.is_bold,
        };
        if bold {
            Verdict::Abstain
        } else {
            Verdict::Reject
        }
    }
}

/// Requires the line to start near the left edge or sit centered.
pub struct PositionRule {
    left_margin_ratio: f32,
    center_start: f32,
    center_end: f32,
}

impl PositionRule {
    pub fn new(left_margin_ratio: f32, center_start: f32, center_end: f32) -> Self {
        Self {
            left_margin_ratio,
            center_start,
            center_end,
        }
    }
}

impl LineRule for PositionRule {
    fn name(&self) -> &str {
        "position"
    }

    fn evaluate(&self, line: &Line) -> Verdict {
        let width = line.page_width;
        if !(width.is_finite() && width > 0.0) {
            return Verdict::Abstain;
        }

        let left_aligned = line.bbox.x0 <= width * self.left_margin_ratio;
        let center = line.bbox.center_x();
        let centered = center >= width * self.center_start && center <= width * self.center_end;

        if left_aligned || centered {
            Verdict::Abstain
        } else {
            Verdict::Reject
        }
    }
}

/// Rejects lines shorter than a character count.
pub struct MinLengthRule {
    min_chars: usize,
}

impl MinLengthRule {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }
}

impl LineRule for MinLengthRule {
    fn name(&self) -> &str {
        "min-length"
    }

    fn evaluate(&self, line: &Line) -> Verdict {
        if line.char_len() < self.min_chars {
            Verdict::Reject
        } else {
            Verdict::Abstain
        }
    }
}

/// Rejects lines where letters and digits are too rare.
pub struct AlnumRatioRule {
    min_ratio: f32,
}

impl AlnumRatioRule {
    pub fn new(min_ratio: f32) -> Self {
        Self { min_ratio }
    }
}

impl LineRule for AlnumRatioRule {
    fn name(&self) -> &str {
        "alnum-ratio"
    }

    fn evaluate(&self, line: &Line) -> Verdict {
        let total = line.char_len();
        if total == 0 {
            return Verdict::Reject;
        }
        let alnum = line.text.chars().filter(|c| c.is_alphanumeric()).count();
        if (alnum as f32 / total as f32) < self.min_ratio {
            Verdict::Reject
        } else {
            Verdict::Abstain
        }
    }
}

/// Rejects lines that start with a lowercase letter or punctuation.
pub struct CapitalizedRule;

impl LineRule for CapitalizedRule {
    fn name(&self) -> &str {
        "capitalized"
    }

    fn evaluate(&self, line: &Line) -> Verdict {
        match line.text.chars().next() {
            Some(c) if c.is_numeric() || (c.is_alphabetic() && !c.is_lowercase()) => {
                Verdict::Abstain
            }
            _ => Verdict::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn line(text: &str, x0: f32, x1: f32, bold: bool, all_bold: bool) -> Line {
        Line {
            text: text.to_string(),
            font_size: 14.0,
            is_bold: bold,
            all_bold,
            y: 100.0,
            bbox: BoundingBox::new(x0, 100.0, x1, 114.0),
            page: 1,
            page_width: 600.0,
            span_count: 1,
        }
    }

    fn heading(text: &str) -> Line {
        line(text, 50.0, 250.0, true, true)
    }

    struct AcceptAll;

    impl LineRule for AcceptAll {
        fn name(&self) -> &str {
            "accept-all"
        }

        fn evaluate(&self, _line: &Line) -> Verdict {
            Verdict::Accept
        }
    }

    #[test]
    fn test_default_exclusions() {
        let rules = RuleSet::exclusion(&ClassifierOptions::default()).unwrap();
        for text in ["12", " 7 ", "Page 3", "page 4 of 20", "iv", "12/03/2024", "March 5, 2024", "© 2024 Acme"] {
            assert!(!rules.accepts(&heading(text)), "{} should be excluded", text);
        }
        for text in ["Introduction", "12 Angry Men", "Chapter 2", "2024 Results"] {
            assert!(rules.accepts(&heading(text)), "{} should pass", text);
        }
    }

    #[test]
    fn test_invalid_pattern_reports_name() {
        let options = ClassifierOptions::default().with_exclusion("broken", "([a-z");
        match RuleSet::exclusion(&options) {
            Err(Error::InvalidPattern { name, .. }) => assert_eq!(name, "broken"),
            other => panic!("expected InvalidPattern, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn test_bold_policy() {
        let mixed = line("Mostly Bold", 50.0, 250.0, true, false);
        assert_eq!(BoldRule::new(BoldPolicy::All).evaluate(&mixed), Verdict::Reject);
        assert_eq!(
            BoldRule::new(BoldPolicy::Majority).evaluate(&mixed),
            Verdict::Abstain
        );
    }

    #[test]
    fn test_spacing_patterns() {
        let options = ClassifierOptions::default();
        let rule = PatternRule::compile("spacing", &options.spacing_patterns).unwrap();
        assert_eq!(rule.evaluate(&heading("Overview  12")), Verdict::Reject);
        assert_eq!(rule.matching_pattern("Overview  12"), Some("double-space"));
        assert_eq!(rule.evaluate(&heading("Contents ....... 4")), Verdict::Reject);
        assert_eq!(rule.evaluate(&heading("Normal Heading 2")), Verdict::Abstain);
    }

    #[test]
    fn test_position_rule() {
        let rule = PositionRule::new(0.15, 0.3, 0.7);
        // Left edge within 90pt of a 600pt page
        assert_eq!(rule.evaluate(&heading("Left")), Verdict::Abstain);
        // Midpoint 300 is centered
        assert_eq!(
            rule.evaluate(&line("Centered", 250.0, 350.0, true, true)),
            Verdict::Abstain
        );
        // Right-aligned: x0 = 450, midpoint 500
        assert_eq!(
            rule.evaluate(&line("Right", 450.0, 550.0, true, true)),
            Verdict::Reject
        );
    }

    #[test]
    fn test_fragment_rules() {
        let rules = RuleSet::fragment(&ClassifierOptions::default());
        assert!(!rules.accepts(&heading("Abc")));
        assert!(!rules.accepts(&heading("--- * ---")));
        assert!(!rules.accepts(&heading("continued from above")));
        assert!(rules.accepts(&heading("3 Results")));
        assert!(rules.accepts(&heading("Methods")));
    }

    #[test]
    fn test_short_circuit_and_decider() {
        let rules = RuleSet::new()
            .with_rule(AcceptAll)
            .with_rule(MinLengthRule::new(100));
        let decision = rules.evaluate(&heading("Short"));
        assert!(decision.accepted);
        assert_eq!(decision.decided_by, Some("accept-all"));

        let rules = RuleSet::new().with_rule(MinLengthRule::new(100));
        let decision = rules.evaluate(&heading("Short"));
        assert!(!decision.accepted);
        assert_eq!(decision.decided_by, Some("min-length"));

        assert!(RuleSet::new().accepts(&heading("anything")));
    }

    #[test]
    fn test_style_rule_order() {
        let rules = RuleSet::style(&ClassifierOptions::default()).unwrap();
        assert_eq!(
            rules.names(),
            vec!["bold", "spacing", "position", "min-length", "alnum-ratio", "capitalized"]
        );
    }
}
