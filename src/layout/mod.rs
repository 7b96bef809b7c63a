//! Layout analysis: raw decoder spans to ordered text lines.
//!
//! ```text
//! RawSpan[] (per page)  ->  Span[]      ->  Line[]
//!                           normalize       group_spans_into_lines
//! ```

mod lines;
mod normalize;

pub use lines::group_spans_into_lines;
pub use normalize::{clean_text, is_bold_span, normalize_page, normalize_span, BOLD_FONT_MARKERS};

use crate::model::{DocumentLayout, Line};

/// Turn a decoded document into its full line stream.
///
/// Lines are ordered by page number, then top to bottom. Pages keep their
/// decoder order when numbers tie.
pub fn analyze_layout(layout: &DocumentLayout) -> Vec<Line> {
    let mut pages: Vec<_> = layout.pages.iter().collect();
    pages.sort_by_key(|p| p.number);

    let mut lines = Vec::new();
    for page in pages {
        let spans = normalize_page(page);
        let page_lines = group_spans_into_lines(spans, page.width);
        log::debug!(
            "Page {}: {} spans -> {} lines",
            page.number,
            page.spans.len(),
            page_lines.len()
        );
        lines.extend(page_lines);
    }
    lines
}
