//! Layout decoders with a registry keyed by file extension.
//!
//! # Example
//!
//! ```no_run
//! use docsect::decode::DecoderRegistry;
//! use std::path::Path;
//!
//! fn main() -> docsect::Result<()> {
//!     let registry = DecoderRegistry::with_defaults();
//!     let layout = registry.decode_path(Path::new("report.pdf"))?;
//!     println!("{} pages", layout.page_count());
//!     Ok(())
//! }
//! ```

mod backend;
mod content;
mod json;
mod pdf;

pub use backend::{
    decode_text_simple, strip_subset_prefix, BackendFontInfo, ContentOp, LopdfBackend, PageId,
    PdfBackend, PdfValue,
};
pub use content::{PageFrame, SpanWalker};
pub use json::JsonLayoutDecoder;
pub use pdf::PdfDecoder;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::detect::sniff_path;
use crate::error::{Error, Result};
use crate::model::DocumentLayout;

/// Turns a document into pages of positioned, styled spans.
///
/// Implement this trait to feed a new input format through the pipeline.
pub trait LayoutDecoder: Send + Sync {
    /// Supported file extensions, lowercase without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Decoder name.
    fn name(&self) -> &str;

    /// Decode a file.
    fn decode_path(&self, path: &Path) -> Result<DocumentLayout>;

    /// Decode from bytes.
    fn decode_bytes(&self, bytes: &[u8]) -> Result<DocumentLayout>;

    /// Check if this decoder handles the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext)
    }
}

/// Maps file extensions to decoders.
#[derive(Clone)]
pub struct DecoderRegistry {
    by_extension: HashMap<String, Arc<dyn LayoutDecoder>>,
    by_name: HashMap<String, Arc<dyn LayoutDecoder>>,
}

impl DecoderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            by_extension: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registry with the PDF and layout-JSON decoders.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfDecoder::new()));
        registry.register(Arc::new(JsonLayoutDecoder::new()));
        registry
    }

    /// Register a decoder for all its extensions. Later registrations win.
    pub fn register(&mut self, decoder: Arc<dyn LayoutDecoder>) {
        for ext in decoder.supported_extensions() {
            self.by_extension.insert(ext.to_lowercase(), decoder.clone());
        }
        self.by_name.insert(decoder.name().to_lowercase(), decoder);
    }

    /// Decoder for a file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn LayoutDecoder>> {
        self.by_extension.get(&ext.to_lowercase()).cloned()
    }

    /// Decoder by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn LayoutDecoder>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Whether an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.by_extension.contains_key(&ext.to_lowercase())
    }

    /// Whether a path has a supported extension.
    pub fn supports_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.supports(e))
    }

    /// Supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.by_extension.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }

    /// Pick a decoder for a path: by extension, else by leading bytes.
    pub fn resolve(&self, path: &Path) -> Result<Arc<dyn LayoutDecoder>> {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if let Some(decoder) = self.get_by_extension(ext) {
                return Ok(decoder);
            }
        }

        sniff_path(path)?
            .and_then(|kind| self.get_by_extension(kind.extension()))
            .ok_or_else(|| Error::UnknownFormat(path.display().to_string()))
    }

    /// Decode a file with the matching decoder.
    pub fn decode_path(&self, path: &Path) -> Result<DocumentLayout> {
        let decoder = self.resolve(path)?;
        log::debug!("Decoding {} with {}", path.display(), decoder.name());
        decoder.decode_path(path)
    }

    /// Decode bytes with the decoder for `ext`.
    pub fn decode_bytes(&self, bytes: &[u8], ext: &str) -> Result<DocumentLayout> {
        let decoder = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnknownFormat(format!("no decoder for extension: {}", ext)))?;
        decoder.decode_bytes(bytes)
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
