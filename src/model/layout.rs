//! Decoder output: positioned, styled text as it sits on the page.

use serde::{Deserialize, Serialize};

/// Style flag bit the layout decoder sets on bold spans.
pub const BOLD_FLAG: u32 = 1 << 4;

/// Axis-aligned box in page coordinates.
///
/// The origin is the top-left corner of the page; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from its four edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box (never negative).
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Horizontal midpoint.
    pub fn center_x(&self) -> f32 {
        self.x0 + self.width() / 2.0
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Whether all four edges are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }
}

/// A raw span record exactly as the decoder emits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    /// Text content, untrimmed
    pub text: String,
    /// Font family / base font name (e.g., "Helvetica-Bold")
    #[serde(default)]
    pub font: String,
    /// Font size in points
    pub size: f32,
    /// Style flags; bit 4 marks bold
    #[serde(default)]
    pub flags: u32,
    /// Position on the page
    pub bbox: BoundingBox,
}

impl RawSpan {
    /// Create a raw span.
    pub fn new(
        text: impl Into<String>,
        font: impl Into<String>,
        size: f32,
        flags: u32,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            size,
            flags,
            bbox,
        }
    }
}

/// One decoded page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Spans in decoder order
    #[serde(default)]
    pub spans: Vec<RawSpan>,
}

impl PageLayout {
    /// Create an empty page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            spans: Vec::new(),
        }
    }

    /// Create a US Letter page (612x792 points).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Append a span.
    pub fn push(&mut self, span: RawSpan) {
        self.spans.push(span);
    }

    /// Builder-style span append.
    pub fn with_span(mut self, span: RawSpan) -> Self {
        self.spans.push(span);
        self
    }
}

/// Document-level metadata the decoder exposes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Info dictionary title
    pub title: Option<String>,
    /// Info dictionary subject
    pub subject: Option<String>,
}

impl DocumentMetadata {
    /// First non-blank of title, subject.
    pub fn preferred_title(&self) -> Option<&str> {
        [self.title.as_deref(), self.subject.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|t| !t.is_empty())
    }
}

/// A whole decoded document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Document metadata
    #[serde(default)]
    pub metadata: DocumentMetadata,
    /// Pages in document order
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn add_page(&mut self, page: PageLayout) {
        self.pages.push(page);
    }

    /// Set the metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Total number of raw spans.
    pub fn span_count(&self) -> usize {
        self.pages.iter().map(|p| p.spans.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_geometry() {
        let a = BoundingBox::new(10.0, 20.0, 110.0, 32.0);
        assert_eq!(a.width(), 100.0);
        assert_eq!(a.center_x(), 60.0);

        let b = BoundingBox::new(5.0, 25.0, 50.0, 40.0);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox::new(5.0, 20.0, 110.0, 40.0));
    }

    #[test]
    fn test_preferred_title() {
        let mut meta = DocumentMetadata::default();
        assert_eq!(meta.preferred_title(), None);

        meta.title = Some("   ".to_string());
        meta.subject = Some("Annual Report".to_string());
        assert_eq!(meta.preferred_title(), Some("Annual Report"));

        meta.title = Some(" Field Guide ".to_string());
        assert_eq!(meta.preferred_title(), Some("Field Guide"));
    }

    #[test]
    fn test_layout_deserializes_with_defaults() {
        let json = r#"{
            "pages": [{
                "number": 1, "width": 600.0, "height": 800.0,
                "spans": [{"text": "Hi", "size": 12.0,
                           "bbox": {"x0": 0.0, "y0": 0.0, "x1": 10.0, "y1": 12.0}}]
            }]
        }"#;
        let layout: DocumentLayout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.span_count(), 1);
        assert_eq!(layout.pages[0].spans[0].flags, 0);
        assert!(layout.metadata.title.is_none());
    }
}
