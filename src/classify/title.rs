//! Document title resolution.

use crate::model::{
    round_tenth, DocumentMetadata, HeadingCandidate, HeadingLevel, Line, TitleSource,
};
use crate::options::ClassifierOptions;

/// A title and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTitle {
    /// Title text
    pub text: String,
    /// Resolution rule that produced it
    pub source: TitleSource,
}

impl ResolvedTitle {
    fn new(text: impl Into<String>, source: TitleSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

/// Picks a title, first success wins:
///
/// 1. metadata title, then subject
/// 2. the largest first-page line that clears the body size by a margin
/// 3. the first heading candidate
/// 4. the untitled literal
#[derive(Debug, Clone)]
pub struct TitleResolver {
    margin: f32,
    min_chars: usize,
    max_chars: usize,
    untitled: String,
}

impl TitleResolver {
    pub fn new(options: &ClassifierOptions) -> Self {
        Self {
            margin: options.title_margin,
            min_chars: options.title_min_chars,
            max_chars: options.title_max_chars,
            untitled: options.untitled_text.clone(),
        }
    }

    /// Resolve the title.
    ///
    /// `lines` are the lines left after exclusion, in document order;
    /// `body_size` is the document-wide most common size; `candidates` are
    /// the deduplicated heading candidates.
    pub fn resolve(
        &self,
        metadata: &DocumentMetadata,
        lines: &[&Line],
        body_size: Option<f32>,
        candidates: &[HeadingCandidate],
    ) -> ResolvedTitle {
        if let Some(title) = metadata.preferred_title() {
            return ResolvedTitle::new(title, TitleSource::Metadata);
        }
        if let Some(banner) = self.first_page_banner(lines, body_size, candidates) {
            return ResolvedTitle::new(banner, TitleSource::FirstPageBanner);
        }
        if let Some(first) = candidates.first() {
            return ResolvedTitle::new(first.text.clone(), TitleSource::FirstHeading);
        }
        ResolvedTitle::new(self.untitled.clone(), TitleSource::Untitled)
    }

    /// Largest line on the first page that is not an H-level heading.
    ///
    /// Directly following lines of the same size are joined to it, so a
    /// title wrapped over two lines comes back whole.
    fn first_page_banner(
        &self,
        lines: &[&Line],
        body_size: Option<f32>,
        candidates: &[HeadingCandidate],
    ) -> Option<String> {
        let body = body_size?;
        let first_page = lines.iter().map(|l| l.page).min()?;
        let page: Vec<&Line> = lines
            .iter()
            .copied()
            .filter(|l| l.page == first_page)
            .collect();

        let is_heading = |line: &Line| {
            candidates.iter().any(|c| {
                matches!(c.level, HeadingLevel::Heading(_))
                    && c.page == line.page
                    && c.y == line.y
                    && c.text == line.text
            })
        };

        let mut top: Option<(usize, &Line)> = None;
        for (i, line) in page.iter().copied().enumerate() {
            if is_heading(line) {
                continue;
            }
            match top {
                Some((_, best)) if best.size_key() >= line.size_key() => {}
                _ => top = Some((i, line)),
            }
        }
        let (start, banner) = top?;

        if round_tenth(banner.font_size) <= body + self.margin {
            return None;
        }

        let text = page[start..]
            .iter()
            .take_while(|l| l.size_key() == banner.size_key() && !is_heading(l))
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let len = text.chars().count();
        if len < self.min_chars || len > self.max_chars {
            log::debug!("Banner candidate {:?} rejected: {} chars", text, len);
            return None;
        }
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn line(text: &str, size: f32, y: f32, page: u32) -> Line {
        Line {
            text: text.to_string(),
            font_size: size,
            is_bold: false,
            all_bold: false,
            y,
            bbox: BoundingBox::new(72.0, y, 300.0, y + size),
            page,
            page_width: 612.0,
            span_count: 1,
        }
    }

    fn heading(text: &str, level: HeadingLevel, y: f32, page: u32) -> HeadingCandidate {
        HeadingCandidate {
            text: text.to_string(),
            level,
            page,
            y,
            font_size: 18.0,
        }
    }

    fn resolver() -> TitleResolver {
        TitleResolver::new(&ClassifierOptions::default())
    }

    #[test]
    fn test_metadata_wins() {
        let metadata = DocumentMetadata {
            title: Some("  ".to_string()),
            subject: Some("Quarterly Review".to_string()),
        };
        let lines = [line("Big Banner", 30.0, 50.0, 1)];
        let refs: Vec<&Line> = lines.iter().collect();
        let title = resolver().resolve(&metadata, &refs, Some(11.0), &[]);
        assert_eq!(title.text, "Quarterly Review");
        assert_eq!(title.source, TitleSource::Metadata);
    }

    #[test]
    fn test_banner_joins_wrapped_lines() {
        let lines = [
            line("Understanding Distributed", 26.0, 60.0, 1),
            line("Consensus Protocols", 26.0, 90.0, 1),
            line("A practical survey", 14.0, 130.0, 1),
            line("Body text.", 11.0, 170.0, 1),
            line("More body.", 11.0, 185.0, 1),
        ];
        let refs: Vec<&Line> = lines.iter().collect();
        let title = resolver().resolve(&DocumentMetadata::default(), &refs, Some(11.0), &[]);
        assert_eq!(
            title.text,
            "Understanding Distributed Consensus Protocols"
        );
        assert_eq!(title.source, TitleSource::FirstPageBanner);
    }

    #[test]
    fn test_banner_skips_headings_and_needs_margin() {
        let lines = [
            line("Introduction", 18.0, 72.0, 1),
            line("Body text.", 11.0, 100.0, 1),
            line("Aside Note", 12.5, 130.0, 1),
        ];
        let refs: Vec<&Line> = lines.iter().collect();
        let candidates = [heading("Introduction", HeadingLevel::Heading(1), 72.0, 1)];
        let title = resolver().resolve(&DocumentMetadata::default(), &refs, Some(11.0), &candidates);
        // 12.5 is within the 2pt margin of body size
        assert_eq!(title.text, "Introduction");
        assert_eq!(title.source, TitleSource::FirstHeading);
    }

    #[test]
    fn test_untitled_fallback() {
        let title = resolver().resolve(&DocumentMetadata::default(), &[], None, &[]);
        assert_eq!(title.text, "Untitled Document");
        assert_eq!(title.source, TitleSource::Untitled);
    }

    #[test]
    fn test_banner_length_bounds() {
        let lines = [line("Hi", 30.0, 50.0, 1), line("Body text.", 11.0, 100.0, 1)];
        let refs: Vec<&Line> = lines.iter().collect();
        let title = resolver().resolve(&DocumentMetadata::default(), &refs, Some(11.0), &[]);
        assert_eq!(title.source, TitleSource::Untitled);
    }
}
