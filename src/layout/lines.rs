//! Line assembly: group spans sharing a vertical position.

use std::collections::BTreeMap;

use crate::model::{from_tenths, to_tenths, Line, Span};

/// Group one page's spans into lines.
///
/// Spans whose top edge rounds to the same tenth of a point form one line.
/// Within a line, spans are ordered left to right (stable for equal x);
/// lines come back ordered top to bottom.
pub fn group_spans_into_lines(spans: Vec<Span>, page_width: f32) -> Vec<Line> {
    let mut rows: BTreeMap<i64, Vec<Span>> = BTreeMap::new();
    for span in spans {
        rows.entry(to_tenths(span.bbox.y0)).or_default().push(span);
    }

    rows.into_iter()
        .filter_map(|(key, mut row)| {
            row.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
            Line::from_spans(&row, from_tenths(key), page_width)
        })
        .collect()
}
