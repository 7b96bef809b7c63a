//! Plain-text outline rendering for terminals.

use std::fmt::Write;

use crate::model::{HeadingLevel, Outline};

/// Render an outline as an indented tree, one heading per line.
///
/// ```text
/// Annual Report
///   Overview (p. 1)
///     Scope (p. 2)
/// ```
pub fn outline_to_text(outline: &Outline) -> String {
    let mut out = String::new();
    out.push_str(&outline.title);
    out.push('\n');

    for heading in &outline.headings {
        let depth = match heading.level {
            HeadingLevel::Title => 0,
            HeadingLevel::Heading(n) => n as usize,
        };
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{}{} (p. {})",
            "  ".repeat(depth),
            heading.text,
            heading.page
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingCandidate, TitleSource};

    fn heading(text: &str, level: u8, page: u32) -> HeadingCandidate {
        HeadingCandidate {
            text: text.to_string(),
            level: HeadingLevel::Heading(level),
            page,
            y: 0.0,
            font_size: 12.0,
        }
    }

    #[test]
    fn test_outline_to_text() {
        let outline = Outline {
            title: "Annual Report".to_string(),
            title_source: TitleSource::FirstPageBanner,
            headings: vec![heading("Overview", 1, 1), heading("Scope", 2, 2)],
        };
        assert_eq!(
            outline_to_text(&outline),
            "Annual Report\n  Overview (p. 1)\n    Scope (p. 2)\n"
        );
    }
}
