//! Normalized spans and the lines assembled from them.

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// Scale a coordinate or size to integer tenths.
///
/// Used as an exact grouping key so equal rounded values always compare
/// equal, regardless of float noise.
pub fn to_tenths(value: f32) -> i64 {
    (value * 10.0).round() as i64
}

/// Inverse of [`to_tenths`].
pub fn from_tenths(key: i64) -> f32 {
    key as f32 / 10.0
}

/// Round to one decimal place.
pub fn round_tenth(value: f32) -> f32 {
    from_tenths(to_tenths(value))
}

/// A cleaned text span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Trimmed, whitespace-normalized text (never empty)
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Bold by font name or style flag
    pub is_bold: bool,
    /// Position on the page
    pub bbox: BoundingBox,
    /// Page number (1-indexed)
    pub page: u32,
}

/// A reconstructed text line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Span texts joined left to right with single spaces
    pub text: String,
    /// Largest span font size on the line
    pub font_size: f32,
    /// Bold spans are a strict majority
    pub is_bold: bool,
    /// Every span is bold
    pub all_bold: bool,
    /// Top edge, rounded to one decimal
    pub y: f32,
    /// Union of the span boxes
    pub bbox: BoundingBox,
    /// Page number (1-indexed)
    pub page: u32,
    /// Width of the page the line sits on
    pub page_width: f32,
    /// Number of spans merged into this line
    pub span_count: usize,
}

impl Line {
    /// Build a line from spans already sorted left to right.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_spans(spans: &[Span], y: f32, page_width: f32) -> Option<Self> {
        let first = spans.first()?;

        let text = spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let font_size = spans
            .iter()
            .map(|s| s.font_size)
            .fold(f32::MIN, f32::max);
        let bold = spans.iter().filter(|s| s.is_bold).count();
        let bbox = spans
            .iter()
            .skip(1)
            .fold(first.bbox, |acc, s| acc.union(&s.bbox));

        Some(Self {
            text,
            font_size,
            is_bold: bold * 2 > spans.len(),
            all_bold: bold == spans.len(),
            y,
            bbox,
            page: first.page,
            page_width,
            span_count: spans.len(),
        })
    }

    /// Font size rounded to one decimal, as an exact key.
    pub fn size_key(&self) -> i64 {
        to_tenths(self.font_size)
    }

    /// Character count of the line text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, size: f32, bold: bool, x0: f32) -> Span {
        Span {
            text: text.to_string(),
            font_size: size,
            is_bold: bold,
            bbox: BoundingBox::new(x0, 100.0, x0 + 40.0, 112.0),
            page: 2,
        }
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(to_tenths(11.96), 120);
        assert_eq!(to_tenths(12.04), 120);
        assert_eq!(round_tenth(14.349), 14.3);
        assert_eq!(from_tenths(185), 18.5);
    }

    #[test]
    fn test_line_from_spans() {
        let spans = vec![
            span("Chapter", 14.0, true, 50.0),
            span("One", 16.0, true, 95.0),
            span("(draft)", 10.0, false, 140.0),
        ];
        let line = Line::from_spans(&spans, 100.0, 600.0).unwrap();
        assert_eq!(line.text, "Chapter One (draft)");
        assert_eq!(line.font_size, 16.0);
        assert!(line.is_bold);
        assert!(!line.all_bold);
        assert_eq!(line.bbox.x0, 50.0);
        assert_eq!(line.bbox.x1, 180.0);
        assert_eq!(line.page, 2);
        assert_eq!(line.span_count, 3);
    }

    #[test]
    fn test_bold_tie_is_not_bold() {
        let spans = vec![span("Half", 12.0, true, 0.0), span("plain", 12.0, false, 50.0)];
        let line = Line::from_spans(&spans, 0.0, 600.0).unwrap();
        assert!(!line.is_bold);
        assert!(!line.all_bold);
    }

    #[test]
    fn test_empty_spans() {
        assert!(Line::from_spans(&[], 0.0, 600.0).is_none());
    }
}
