//! Span normalization: text cleanup and style flags.

use unicode_normalization::UnicodeNormalization;

use crate::model::{PageLayout, RawSpan, Span, BOLD_FLAG};

/// Font-name fragments that mark a bold face (matched case-insensitively).
pub const BOLD_FONT_MARKERS: [&str; 4] = ["bold", "black", "heavy", "semibold"];

/// Check if a span is bold from its font name or style flags.
pub fn is_bold_span(font: &str, flags: u32) -> bool {
    let font = font.to_lowercase();
    let font_is_bold = BOLD_FONT_MARKERS.iter().any(|m| font.contains(m));
    let flag_is_bold = flags & BOLD_FLAG != 0;
    font_is_bold || flag_is_bold
}

/// Clean span text.
///
/// Applies NFKC, maps every whitespace character to a plain space, drops
/// control and zero-width characters, and trims both ends. Interior runs
/// of spaces are kept: they are a layout signal for the spacing filter.
pub fn clean_text(raw: &str) -> String {
    let cleaned: String = raw
        .nfkc()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some(' ')
            } else if c.is_control() || is_zero_width(c) {
                None
            } else {
                Some(c)
            }
        })
        .collect();
    cleaned.trim().to_string()
}

fn is_zero_width(c: char) -> bool {
    matches!(
        c,
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'
    )
}

/// Normalize one raw span.
///
/// Returns `None` when the text is empty after cleanup or the span is
/// malformed (non-finite geometry, non-positive size).
pub fn normalize_span(raw: &RawSpan, page: u32) -> Option<Span> {
    if !raw.size.is_finite() || raw.size <= 0.0 || !raw.bbox.is_finite() {
        return None;
    }

    let text = clean_text(&raw.text);
    if text.is_empty() {
        return None;
    }

    Some(Span {
        text,
        font_size: raw.size,
        is_bold: is_bold_span(&raw.font, raw.flags),
        bbox: raw.bbox,
        page,
    })
}

/// Normalize every span on a page, skipping empty and malformed ones.
pub fn normalize_page(page: &PageLayout) -> Vec<Span> {
    let spans: Vec<Span> = page
        .spans
        .iter()
        .filter_map(|raw| normalize_span(raw, page.number))
        .collect();

    let skipped = page.spans.len() - spans.len();
    if skipped > 0 {
        log::debug!(
            "Page {}: dropped {} empty or malformed spans",
            page.number,
            skipped
        );
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn raw(text: &str, font: &str, size: f32, flags: u32) -> RawSpan {
        RawSpan::new(text, font, size, flags, BoundingBox::new(0.0, 0.0, 10.0, 10.0))
    }

    #[test]
    fn test_bold_detection() {
        assert!(is_bold_span("Helvetica-Bold", 0));
        assert!(is_bold_span("Arial-BLACK", 0));
        assert!(is_bold_span("Inter SemiBold", 0));
        assert!(is_bold_span("Roboto-Heavy", 0));
        assert!(is_bold_span("Times-Roman", BOLD_FLAG));
        assert!(!is_bold_span("Times-Roman", 0));
        assert!(!is_bold_span("Helvetica-Oblique", 2));
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Hello\u{00A0}World \n"), "Hello World");
        assert_eq!(clean_text("in\u{200B}visible"), "invisible");
        assert_eq!(clean_text("\u{FB01}nal"), "final");
        assert_eq!(clean_text("Total\t\t42"), "Total  42");
        assert_eq!(clean_text(" \u{200B} "), "");
    }

    #[test]
    fn test_normalize_span_drops_empty_and_malformed() {
        assert!(normalize_span(&raw("   ", "Helvetica", 12.0, 0), 1).is_none());
        assert!(normalize_span(&raw("Text", "Helvetica", 0.0, 0), 1).is_none());
        assert!(normalize_span(&raw("Text", "Helvetica", f32::NAN, 0), 1).is_none());

        let mut bad_box = raw("Text", "Helvetica", 12.0, 0);
        bad_box.bbox.x1 = f32::INFINITY;
        assert!(normalize_span(&bad_box, 1).is_none());

        let span = normalize_span(&raw(" Intro ", "Helvetica-Bold", 14.0, 0), 3).unwrap();
        assert_eq!(span.text, "Intro");
        assert!(span.is_bold);
        assert_eq!(span.page, 3);
    }

    #[test]
    fn test_normalize_page() {
        let page = PageLayout::letter(2)
            .with_span(raw("Heading", "Arial-Bold", 16.0, 0))
            .with_span(raw(" ", "Arial", 11.0, 0))
            .with_span(raw("Body", "Arial", 11.0, 0));
        let spans = normalize_page(&page);
        assert_eq!(spans.len(), 2);
        assert!(spans.iter().all(|s| s.page == 2));
    }
}
