//! Heading levels, heading candidates, and the document outline.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Outline depth inferred from font-size rank.
///
/// Ordering follows visual prominence: `Title` is highest, then `H1`,
/// `H2`, and so on. `HeadingLevel::Title < HeadingLevel::Heading(1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadingLevel {
    /// Document title level
    Title,
    /// Heading level (1 = H1)
    Heading(u8),
}

impl HeadingLevel {
    /// Parse "TITLE" or "H<n>".
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("title") {
            return Some(HeadingLevel::Title);
        }
        let digits = s.strip_prefix('H').or_else(|| s.strip_prefix('h'))?;
        match digits.parse::<u8>() {
            Ok(n) if n > 0 => Some(HeadingLevel::Heading(n)),
            _ => None,
        }
    }

    /// Whether this is the title level.
    pub fn is_title(&self) -> bool {
        matches!(self, HeadingLevel::Title)
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadingLevel::Title => write!(f, "TITLE"),
            HeadingLevel::Heading(n) => write!(f, "H{}", n),
        }
    }
}

impl Serialize for HeadingLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HeadingLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        HeadingLevel::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid heading level: {}", s)))
    }
}

/// A line the classifier kept as a heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    /// Heading text
    pub text: String,
    /// Assigned level
    pub level: HeadingLevel,
    /// Page number (1-indexed)
    pub page: u32,
    /// Top edge of the heading line
    pub y: f32,
    /// Representative font size
    pub font_size: f32,
}

/// Where the resolved title came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitleSource {
    /// Document metadata title or subject
    Metadata,
    /// Largest line on the first page
    FirstPageBanner,
    /// First retained heading
    FirstHeading,
    /// The configured "untitled" literal
    Untitled,
}

/// Title plus ordered heading list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Resolved document title
    pub title: String,
    /// How the title was resolved
    pub title_source: TitleSource,
    /// Headings ordered by (page, y)
    pub headings: Vec<HeadingCandidate>,
}

impl Outline {
    /// Number of headings.
    pub fn len(&self) -> usize {
        self.headings.len()
    }

    /// Whether the outline has no headings.
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    /// Iterate over headings at a given level.
    pub fn at_level(&self, level: HeadingLevel) -> impl Iterator<Item = &HeadingCandidate> {
        self.headings.iter().filter(move |h| h.level == level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display_and_parse() {
        assert_eq!(HeadingLevel::Title.to_string(), "TITLE");
        assert_eq!(HeadingLevel::Heading(3).to_string(), "H3");
        assert_eq!(HeadingLevel::parse("H12"), Some(HeadingLevel::Heading(12)));
        assert_eq!(HeadingLevel::parse("title"), Some(HeadingLevel::Title));
        assert_eq!(HeadingLevel::parse("H0"), None);
        assert_eq!(HeadingLevel::parse("body"), None);
    }

    #[test]
    fn test_level_ordering() {
        assert!(HeadingLevel::Title < HeadingLevel::Heading(1));
        assert!(HeadingLevel::Heading(1) < HeadingLevel::Heading(2));
    }

    #[test]
    fn test_level_serializes_as_string() {
        let json = serde_json::to_string(&HeadingLevel::Heading(2)).unwrap();
        assert_eq!(json, "\"H2\"");
        let back: HeadingLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, HeadingLevel::Heading(2));
    }
}
