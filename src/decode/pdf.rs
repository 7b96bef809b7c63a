//! lopdf-backed layout decoder.

use std::collections::HashMap;
use std::path::Path;

use crate::detect::pdf_version;
use crate::error::Result;
use crate::model::{DocumentLayout, PageLayout};

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::content::{PageFrame, SpanWalker};
use super::LayoutDecoder;

/// Decodes PDF files into positioned, styled spans.
#[derive(Debug, Clone, Default)]
pub struct PdfDecoder {
    _private: (),
}

impl PdfDecoder {
    /// Create a new PDF decoder.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Decode every page of an opened document.
    ///
    /// A page whose content cannot be read comes back empty; the rest of
    /// the document is still decoded.
    pub fn decode_backend<B: PdfBackend>(&self, backend: &B) -> DocumentLayout {
        let mut layout = DocumentLayout {
            metadata: backend.metadata(),
            pages: Vec::new(),
        };

        for (number, page_id) in backend.pages() {
            let page = match decode_page(backend, number, page_id) {
                Ok(page) => page,
                Err(e) => {
                    log::warn!("Page {}: content unreadable, treating as blank: {}", number, e);
                    let [x0, y0, x1, y1] = backend.media_box(page_id);
                    PageLayout::new(number, x1 - x0, y1 - y0)
                }
            };
            layout.add_page(page);
        }

        log::debug!(
            "Decoded {} pages, {} spans",
            layout.page_count(),
            layout.span_count()
        );
        layout
    }
}

fn decode_page<B: PdfBackend>(backend: &B, number: u32, page_id: PageId) -> Result<PageLayout> {
    let media_box = backend.media_box(page_id);
    let [x0, y0, x1, y1] = media_box;
    let mut page = PageLayout::new(number, x1 - x0, y1 - y0);

    let fonts: HashMap<Vec<u8>, _> = backend
        .page_fonts(page_id)?
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect();
    let content = backend.page_content(page_id)?;
    if content.is_empty() {
        return Ok(page);
    }
    let ops = backend.decode_content(&content)?;

    let walker = SpanWalker::new(&fonts, PageFrame::from_media_box(media_box), |font, bytes| {
        backend.decode_text(page_id, font, bytes)
    });
    page.spans = walker.walk(&ops);
    Ok(page)
}

impl LayoutDecoder for PdfDecoder {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn decode_path(&self, path: &Path) -> Result<DocumentLayout> {
        let bytes = std::fs::read(path)?;
        self.decode_bytes(&bytes)
    }

    fn decode_bytes(&self, bytes: &[u8]) -> Result<DocumentLayout> {
        let version = pdf_version(bytes)?;
        log::debug!("PDF version {}", version);
        let backend = LopdfBackend::load_bytes(bytes)?;
        Ok(self.decode_backend(&backend))
    }
}
