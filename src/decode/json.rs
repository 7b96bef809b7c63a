//! Serialized layout decoder.
//!
//! Reads a [`DocumentLayout`] from JSON, so spans produced by any external
//! layout engine can be fed through the pipeline:
//!
//! ```json
//! {
//!   "metadata": { "title": "Report" },
//!   "pages": [{
//!     "number": 1, "width": 612, "height": 792,
//!     "spans": [{ "text": "Introduction", "font": "Arial-Bold", "size": 18,
//!                 "flags": 16, "bbox": { "x0": 72, "y0": 70, "x1": 200, "y1": 88 } }]
//!   }]
//! }
//! ```

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::DocumentLayout;

use super::LayoutDecoder;

/// Decodes `.json` layout files.
#[derive(Debug, Clone, Default)]
pub struct JsonLayoutDecoder {
    _private: (),
}

impl JsonLayoutDecoder {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

/// Check page geometry; spans are checked later by the normalizer.
fn validate(layout: &DocumentLayout) -> Result<()> {
    for page in &layout.pages {
        if !(page.width.is_finite() && page.width > 0.0) {
            return Err(Error::Corrupted(format!(
                "page {} has invalid width {}",
                page.number, page.width
            )));
        }
    }
    Ok(())
}

impl LayoutDecoder for JsonLayoutDecoder {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn name(&self) -> &str {
        "layout-json"
    }

    fn decode_path(&self, path: &Path) -> Result<DocumentLayout> {
        let bytes = std::fs::read(path)?;
        self.decode_bytes(&bytes)
    }

    fn decode_bytes(&self, bytes: &[u8]) -> Result<DocumentLayout> {
        let layout: DocumentLayout = serde_json::from_slice(bytes)?;
        validate(&layout)?;
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_minimal_layout() {
        let json = br#"{
            "pages": [{
                "number": 1, "width": 612, "height": 792,
                "spans": [{ "text": "Hello", "size": 12,
                            "bbox": { "x0": 72, "y0": 70, "x1": 100, "y1": 82 } }]
            }]
        }"#;
        let layout = JsonLayoutDecoder::new().decode_bytes(json).unwrap();
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.pages[0].spans[0].font, "");
        assert_eq!(layout.pages[0].spans[0].flags, 0);
        assert!(layout.metadata.title.is_none());
    }

    #[test]
    fn test_malformed_json() {
        let result = JsonLayoutDecoder::new().decode_bytes(b"{ not json");
        assert!(matches!(result, Err(Error::LayoutJson(_))));
    }

    #[test]
    fn test_invalid_page_width() {
        let json = br#"{ "pages": [{ "number": 1, "width": 0, "height": 792, "spans": [] }] }"#;
        let result = JsonLayoutDecoder::new().decode_bytes(json);
        assert!(matches!(result, Err(Error::Corrupted(_))));
    }
}
