//! Outline assembly from classified candidates.

use crate::classify::{overlaps, Classification, ResolvedTitle};
use crate::model::{HeadingCandidate, Outline, TitleSource};

/// Assembles the final outline.
///
/// Title-level candidates never become headings. Headings that match or
/// overlap a title taken from metadata or the first-page banner are
/// removed. A title borrowed from the first heading leaves that heading in
/// place, since it is the only copy of that text in the outline.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineBuilder;

impl OutlineBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build from a classifier run.
    pub fn build(&self, classification: Classification) -> Outline {
        self.assemble(classification.title, classification.candidates)
    }

    /// Build from a title and candidates.
    pub fn assemble(&self, title: ResolvedTitle, mut candidates: Vec<HeadingCandidate>) -> Outline {
        candidates.sort_by(|a, b| a.page.cmp(&b.page).then(a.y.total_cmp(&b.y)));

        let excludes_title = matches!(
            title.source,
            TitleSource::Metadata | TitleSource::FirstPageBanner
        );
        let title_text = title.text.trim();

        let headings: Vec<HeadingCandidate> = candidates
            .into_iter()
            .filter(|c| !c.level.is_title())
            .filter(|c| {
                let keep = !(excludes_title
                    && !title_text.is_empty()
                    && overlaps(title_text, c.text.trim()));
                if !keep {
                    log::debug!("Heading {:?} duplicates the title", c.text);
                }
                keep
            })
            .collect();

        Outline {
            title: title.text,
            title_source: title.source,
            headings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    fn candidate(text: &str, level: HeadingLevel, page: u32, y: f32) -> HeadingCandidate {
        HeadingCandidate {
            text: text.to_string(),
            level,
            page,
            y,
            font_size: 14.0,
        }
    }

    fn title(text: &str, source: TitleSource) -> ResolvedTitle {
        ResolvedTitle {
            text: text.to_string(),
            source,
        }
    }

    #[test]
    fn test_orders_by_page_then_y() {
        let outline = OutlineBuilder::new().assemble(
            title("Doc", TitleSource::Untitled),
            vec![
                candidate("Later", HeadingLevel::Heading(1), 2, 10.0),
                candidate("Lower", HeadingLevel::Heading(2), 1, 300.0),
                candidate("Upper", HeadingLevel::Heading(1), 1, 50.0),
            ],
        );
        let texts: Vec<_> = outline.headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Upper", "Lower", "Later"]);
    }

    #[test]
    fn test_metadata_title_excluded() {
        let outline = OutlineBuilder::new().assemble(
            title("Annual Report 2024", TitleSource::Metadata),
            vec![
                candidate("Annual Report", HeadingLevel::Heading(1), 1, 40.0),
                candidate("Annual Report 2024", HeadingLevel::Heading(1), 1, 60.0),
                candidate("Financials", HeadingLevel::Heading(1), 2, 40.0),
            ],
        );
        assert_eq!(outline.len(), 1);
        assert_eq!(outline.headings[0].text, "Financials");
    }

    #[test]
    fn test_title_level_dropped() {
        let outline = OutlineBuilder::new().assemble(
            title("Introduction", TitleSource::FirstHeading),
            vec![
                candidate("Big Banner", HeadingLevel::Title, 1, 20.0),
                candidate("Introduction", HeadingLevel::Heading(1), 1, 72.0),
            ],
        );
        assert_eq!(outline.len(), 1);
        assert_eq!(outline.headings[0].text, "Introduction");
        assert_eq!(outline.title_source, TitleSource::FirstHeading);
    }
}
