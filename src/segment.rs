//! Section segmentation: carve the line stream into heading-bounded bodies.

use crate::model::{HeadingCandidate, Line, Outline, Section};
use crate::options::SegmentOptions;

/// Position of a heading in the line stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Page number (1-indexed)
    pub page: u32,
    /// Top edge of the heading line
    pub y: f32,
}

impl Anchor {
    /// Whether `line` sits at or after this anchor.
    pub fn precedes_or_at(&self, line: &Line) -> bool {
        line.page > self.page || (line.page == self.page && line.y >= self.y)
    }

    /// Whether `line` sits strictly before this anchor.
    pub fn follows(&self, line: &Line) -> bool {
        line.page < self.page || (line.page == self.page && line.y < self.y)
    }
}

/// Find a heading in the line stream.
///
/// Prefers the line at the heading's recorded position, then the first
/// line on its page containing the heading text. A heading that cannot be
/// found anchors at the top of its page.
pub fn locate_heading(heading: &HeadingCandidate, lines: &[Line]) -> Anchor {
    let on_page = || lines.iter().filter(|l| l.page == heading.page);

    let exact = on_page().find(|l| l.y == heading.y && l.text.contains(&heading.text));
    let found = exact.or_else(|| on_page().find(|l| l.text.contains(&heading.text)));

    match found {
        Some(line) => Anchor {
            page: line.page,
            y: line.y,
        },
        None => {
            log::debug!(
                "Heading {:?} not found on page {}; anchoring at page top",
                heading.text,
                heading.page
            );
            Anchor {
                page: heading.page,
                y: 0.0,
            }
        }
    }
}

/// Cut `body` to `max_chars` characters and append `ellipsis`.
///
/// Returns the body and whether it was cut.
pub fn truncate_body(body: &str, max_chars: usize, ellipsis: &str) -> (String, bool) {
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => (format!("{}{}", &body[..cut], ellipsis), true),
        None => (body.to_string(), false),
    }
}

/// Splits a document into one section per heading.
#[derive(Debug, Clone, Default)]
pub struct SectionSegmenter {
    options: SegmentOptions,
}

impl SectionSegmenter {
    pub fn new(options: SegmentOptions) -> Self {
        Self { options }
    }

    /// Segment `lines` (every line of the document, in order) by the
    /// headings of `outline`.
    ///
    /// Each body runs from its heading line up to, not including, the next
    /// heading's line; the last runs to the end of the document. Empty
    /// bodies are dropped.
    pub fn segment(&self, document: &str, outline: &Outline, lines: &[Line]) -> Vec<Section> {
        let anchors: Vec<Anchor> = outline
            .headings
            .iter()
            .map(|h| locate_heading(h, lines))
            .collect();

        let sections: Vec<Section> = outline
            .headings
            .iter()
            .zip(&anchors)
            .enumerate()
            .filter_map(|(i, (heading, start))| {
                let end = anchors.get(i + 1);
                let body = lines
                    .iter()
                    .filter(|l| start.precedes_or_at(l) && end.map_or(true, |e| e.follows(l)))
                    .map(|l| l.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n");
                let body = body.trim();
                if body.is_empty() {
                    log::debug!("Section {:?} has an empty body", heading.text);
                    return None;
                }

                let (body, truncated) =
                    truncate_body(body, self.options.max_body_chars, &self.options.ellipsis);
                Some(Section {
                    document: document.to_string(),
                    heading: heading.text.clone(),
                    level: heading.level,
                    page: heading.page,
                    body,
                    truncated,
                })
            })
            .collect();

        log::debug!(
            "{}: {} headings -> {} sections",
            document,
            outline.headings.len(),
            sections.len()
        );
        sections
    }
}
