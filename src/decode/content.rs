//! Content stream walking: text operators to raw spans.
//!
//! Tracks the text matrix, line matrix, leading, and current font through
//! BT/ET, Tf, TL, Td/TD, Tm, T*, Tj/TJ, ' and ". Each text-showing
//! operator yields one span. Coordinates are flipped so y grows downward
//! from the top of the MediaBox.

use std::collections::HashMap;

use crate::model::{BoundingBox, RawSpan};

use super::backend::{BackendFontInfo, ContentOp, PdfValue};

/// Ascent above the baseline, as a fraction of font size.
const ASCENT: f32 = 0.8;
/// Descent below the baseline, as a fraction of font size.
const DESCENT: f32 = 0.2;
/// Average glyph advance, as a fraction of font size.
const AVG_ADVANCE: f32 = 0.5;
/// TJ adjustment (thousandths of an em) treated as a word break.
const SPACE_ADJUSTMENT: f32 = 200.0;
/// Line height used by T* when no leading is set, as a fraction of font size.
const DEFAULT_LEADING: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Pre-multiply by a translation in text space.
    fn translate(&self, tx: f32, ty: f32) -> Matrix {
        Matrix {
            e: tx * self.a + ty * self.c + self.e,
            f: tx * self.b + ty * self.d + self.f,
            ..*self
        }
    }

    fn vertical_scale(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Page geometry the walker flips coordinates against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    /// MediaBox left edge
    pub left: f32,
    /// MediaBox top edge
    pub top: f32,
}

impl PageFrame {
    /// Frame of a MediaBox [x0, y0, x1, y1].
    pub fn from_media_box(media_box: [f32; 4]) -> Self {
        Self {
            left: media_box[0],
            top: media_box[3],
        }
    }
}

/// Walks one page's content operations.
pub struct SpanWalker<'a, D>
where
    D: Fn(&[u8], &[u8]) -> String,
{
    fonts: &'a HashMap<Vec<u8>, BackendFontInfo>,
    frame: PageFrame,
    decode: D,

    text_matrix: Matrix,
    line_matrix: Matrix,
    leading: f32,
    font_key: Vec<u8>,
    font_size: f32,
    in_text: bool,
    spans: Vec<RawSpan>,
}

impl<'a, D> SpanWalker<'a, D>
where
    D: Fn(&[u8], &[u8]) -> String,
{
    /// Create a walker.
    ///
    /// `decode(font_key, bytes)` turns a string operand into text using the
    /// page's font resources.
    pub fn new(fonts: &'a HashMap<Vec<u8>, BackendFontInfo>, frame: PageFrame, decode: D) -> Self {
        Self {
            fonts,
            frame,
            decode,
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            leading: 0.0,
            font_key: Vec::new(),
            font_size: 12.0,
            in_text: false,
            spans: Vec::new(),
        }
    }

    /// Run every operation and return the spans found.
    pub fn walk(mut self, ops: &[ContentOp]) -> Vec<RawSpan> {
        for op in ops {
            self.apply(op);
        }
        self.spans
    }

    fn apply(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "BT" => {
                self.in_text = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.font_key = name.clone();
                }
                if let Some(size) = op.number(1) {
                    self.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = op.number(0) {
                    self.leading = leading;
                }
            }
            "Td" | "TD" => {
                let tx = op.number(0).unwrap_or(0.0);
                let ty = op.number(1).unwrap_or(0.0);
                if op.operator == "TD" {
                    self.leading = -ty;
                }
                self.move_line(tx, ty);
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    let m = Matrix {
                        a: op.number(0).unwrap_or(1.0),
                        b: op.number(1).unwrap_or(0.0),
                        c: op.number(2).unwrap_or(0.0),
                        d: op.number(3).unwrap_or(1.0),
                        e: op.number(4).unwrap_or(0.0),
                        f: op.number(5).unwrap_or(0.0),
                    };
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    self.show(items);
                }
            }
            "'" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            "\"" => {
                self.next_line();
                if let Some(PdfValue::Str(bytes)) = op.operands.get(2) {
                    self.show(&[PdfValue::Str(bytes.clone())]);
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = self.line_matrix.translate(tx, ty);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * DEFAULT_LEADING
        };
        self.move_line(0.0, -leading);
    }

    /// Show a TJ-style array of strings and kerning adjustments.
    fn show(&mut self, items: &[PdfValue]) {
        if !self.in_text {
            return;
        }

        let origin = self.text_matrix;
        let mut text = String::new();
        let mut advance = 0.0f32;

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    let decoded = (self.decode)(&self.font_key, bytes);
                    advance += decoded.chars().count() as f32 * self.font_size * AVG_ADVANCE;
                    text.push_str(&decoded);
                }
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let adjustment = -item.as_number().unwrap_or(0.0);
                    advance += adjustment / 1000.0 * self.font_size;
                    if adjustment > SPACE_ADJUSTMENT && needs_space(&text) {
                        text.push(' ');
                    }
                }
                _ => {}
            }
        }

        self.text_matrix = origin.translate(advance, 0.0);

        if text.trim().is_empty() {
            return;
        }

        let size = self.font_size * origin.vertical_scale();
        if !(size.is_finite() && size > 0.0) {
            return;
        }

        let width = advance.max(0.0) * origin.horizontal_scale();
        let x0 = origin.e - self.frame.left;
        let baseline = origin.f;
        let bbox = BoundingBox::new(
            x0,
            self.frame.top - (baseline + size * ASCENT),
            x0 + width,
            self.frame.top - (baseline - size * DESCENT),
        );

        let (font, flags) = match self.fonts.get(&self.font_key) {
            Some(info) => (info.base_font.clone(), info.flags),
            None => (String::from_utf8_lossy(&self.font_key).into_owned(), 0),
        };

        self.spans.push(RawSpan::new(text, font, size, flags, bbox));
    }
}

/// Whether a word break should add a space after `text`.
fn needs_space(text: &str) -> bool {
    match text.chars().last() {
        Some(c) => !c.is_whitespace() && !is_spaceless_script_char(c),
        None => false,
    }
}

/// Scripts written without spaces between words (Chinese, Japanese kana).
/// Hangul is excluded: Korean uses word spaces.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(
        c as u32,
        0x4E00..=0x9FFF
            | 0x3400..=0x4DBF
            | 0x20000..=0x2EBEF
            | 0x3040..=0x309F
            | 0x30A0..=0x30FF
            | 0x3000..=0x303F
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BOLD_FLAG;

    fn name(s: &str) -> PdfValue {
        PdfValue::Name(s.as_bytes().to_vec())
    }

    fn string(s: &str) -> PdfValue {
        PdfValue::Str(s.as_bytes().to_vec())
    }

    fn num(n: f32) -> PdfValue {
        PdfValue::Real(n)
    }

    fn fonts() -> HashMap<Vec<u8>, BackendFontInfo> {
        let mut fonts = HashMap::new();
        fonts.insert(
            b"F1".to_vec(),
            BackendFontInfo {
                name: b"F1".to_vec(),
                base_font: "Helvetica".to_string(),
                flags: 0,
            },
        );
        fonts.insert(
            b"F2".to_vec(),
            BackendFontInfo {
                name: b"F2".to_vec(),
                base_font: "Helvetica".to_string(),
                flags: BOLD_FLAG,
            },
        );
        fonts
    }

    fn walk(ops: Vec<ContentOp>) -> Vec<RawSpan> {
        let fonts = fonts();
        let frame = PageFrame::from_media_box([0.0, 0.0, 612.0, 792.0]);
        SpanWalker::new(&fonts, frame, |_, bytes| {
            String::from_utf8_lossy(bytes).into_owned()
        })
        .walk(&ops)
    }

    #[test]
    fn test_top_down_bbox() {
        let spans = walk(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F2"), num(20.0)]),
            ContentOp::new("Td", vec![num(72.0), num(700.0)]),
            ContentOp::new("Tj", vec![string("Title")]),
            ContentOp::new("ET", vec![]),
        ]);
        assert_eq!(spans.len(), 1);
        let span = &spans[0];
        assert_eq!(span.text, "Title");
        assert_eq!(span.size, 20.0);
        assert_eq!(span.flags, BOLD_FLAG);
        assert_eq!(span.bbox.x0, 72.0);
        // 792 - (700 + 16)
        assert_eq!(span.bbox.y0, 76.0);
        assert_eq!(span.bbox.y1, 96.0);
        assert_eq!(span.bbox.x1, 72.0 + 5.0 * 10.0);
    }

    #[test]
    fn test_leading_and_next_line() {
        let spans = walk(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), num(10.0)]),
            ContentOp::new("TL", vec![num(14.0)]),
            ContentOp::new("Td", vec![num(72.0), num(700.0)]),
            ContentOp::new("Tj", vec![string("one")]),
            ContentOp::new("T*", vec![]),
            ContentOp::new("Tj", vec![string("two")]),
            ContentOp::new("'", vec![string("three")]),
            ContentOp::new("ET", vec![]),
        ]);
        let tops: Vec<f32> = spans.iter().map(|s| s.bbox.y0).collect();
        assert_eq!(tops, vec![84.0, 98.0, 112.0]);
        assert!(spans.iter().all(|s| s.bbox.x0 == 72.0));
    }

    #[test]
    fn test_td_sets_leading() {
        let spans = walk(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), num(10.0)]),
            ContentOp::new("Td", vec![num(50.0), num(500.0)]),
            ContentOp::new("TD", vec![num(0.0), num(-20.0)]),
            ContentOp::new("Tj", vec![string("a")]),
            ContentOp::new("T*", vec![]),
            ContentOp::new("Tj", vec![string("b")]),
            ContentOp::new("ET", vec![]),
        ]);
        assert_eq!(spans[1].bbox.y0 - spans[0].bbox.y0, 20.0);
    }

    #[test]
    fn test_tj_kerning_inserts_spaces() {
        let spans = walk(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), num(10.0)]),
            ContentOp::new(
                "TJ",
                vec![PdfValue::Array(vec![
                    string("Hello"),
                    PdfValue::Integer(-250),
                    string("world"),
                    PdfValue::Integer(-30),
                    string("!"),
                ])],
            ),
            ContentOp::new("ET", vec![]),
        ]);
        assert_eq!(spans[0].text, "Hello world!");
    }

    #[test]
    fn test_tm_scales_font_and_text_advances() {
        let spans = walk(vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![name("F1"), num(1.0)]),
            ContentOp::new(
                "Tm",
                vec![num(12.0), num(0.0), num(0.0), num(12.0), num(100.0), num(400.0)],
            ),
            ContentOp::new("Tj", vec![string("ab")]),
            ContentOp::new("Tj", vec![string("cd")]),
            ContentOp::new("ET", vec![]),
        ]);
        assert_eq!(spans[0].size, 12.0);
        assert_eq!(spans[1].bbox.x0, 112.0);
        assert_eq!(spans[0].bbox.y0, spans[1].bbox.y0);
    }

    #[test]
    fn test_text_outside_bt_and_blank_text_ignored() {
        let spans = walk(vec![
            ContentOp::new("Tj", vec![string("stray")]),
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tj", vec![string("   ")]),
            ContentOp::new("Tf", vec![name("F9"), num(9.0)]),
            ContentOp::new("Tj", vec![string("unknown font")]),
            ContentOp::new("ET", vec![]),
        ]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].font, "F9");
    }

    #[test]
    fn test_spaceless_scripts() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('カ'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!needs_space("漢字"));
        assert!(needs_space("word"));
        assert!(!needs_space("word "));
    }
}
