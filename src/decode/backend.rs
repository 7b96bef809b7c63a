//! PDF backend abstraction layer.
//!
//! Isolates the concrete PDF library (lopdf) from span extraction: the
//! content-stream walker only sees [`ContentOp`]s, font facts, and decoded
//! strings.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};
use crate::model::{DocumentMetadata, BOLD_FLAG};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// FontDescriptor flag: paint glyphs bold.
const FORCE_BOLD: i64 = 1 << 18;

/// Weight at which a font descriptor counts as bold.
const BOLD_WEIGHT: f32 = 600.0;

/// US Letter, used when a page has no usable MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Font facts the span walker needs.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendFontInfo {
    /// Resource name (key in the page's font dictionary)
    pub name: Vec<u8>,
    /// Base font name without subset prefix (e.g. "Helvetica-Bold")
    pub base_font: String,
    /// Style flags; [`BOLD_FLAG`] is set for heavy descriptors
    pub flags: u32,
}

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }

    /// Numeric operand at `index`.
    pub fn number(&self, index: usize) -> Option<f32> {
        self.operands.get(index).and_then(PdfValue::as_number)
    }
}

/// Abstract interface for PDF document access.
pub trait PdfBackend {
    /// All pages as page number -> PageId.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// MediaBox as [x0, y0, x1, y1], inherited from parent nodes if needed.
    fn media_box(&self, page: PageId) -> [f32; 4];

    /// Fonts of a page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>>;

    /// Raw (decompressed) content stream bytes of a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse content stream bytes into operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a string with the font's encoding on the given page.
    /// Falls back to [`decode_text_simple`] if no encoding is available.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;

    /// Info dictionary title and subject.
    fn metadata(&self) -> DocumentMetadata;
}

/// Text decoding fallback: UTF-16BE with BOM, then UTF-8, then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Drop a subset tag like "ABCDEF+" from a base font name.
pub fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Self::checked(doc)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Self::checked(doc)
    }

    fn checked(doc: LopdfDocument) -> Result<Self> {
        // lopdf opens empty-password documents transparently; anything it
        // could not decrypt surfaces as Error::Encrypted from load
        if doc.is_encrypted() {
            log::debug!("Document is encrypted with an empty user password");
        }
        Ok(Self { doc })
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// FontDescriptor of a simple font, or of a composite font's descendant.
    fn font_descriptor<'a>(&'a self, font: &'a Dictionary) -> Option<&'a Dictionary> {
        if let Some(desc) = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| self.resolve_dict(o))
        {
            return Some(desc);
        }

        let descendants = match font.get(b"DescendantFonts").ok()? {
            Object::Reference(r) => self.doc.get_object(*r).ok()?.as_array().ok()?,
            Object::Array(a) => a,
            _ => return None,
        };
        let descendant = self.resolve_dict(descendants.first()?)?;
        descendant
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| self.resolve_dict(o))
    }

    fn font_flags(&self, font: &Dictionary) -> u32 {
        let Some(desc) = self.font_descriptor(font) else {
            return 0;
        };
        let flags = desc
            .get(b"Flags")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0);
        let weight = desc
            .get(b"FontWeight")
            .ok()
            .and_then(|o| o.as_float().ok())
            .unwrap_or(0.0);

        if weight >= BOLD_WEIGHT || flags & FORCE_BOLD != 0 {
            BOLD_FLAG
        } else {
            0
        }
    }

    fn info_dict(&self) -> Option<&Dictionary> {
        self.resolve_dict(self.doc.trailer.get(b"Info").ok()?)
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn media_box(&self, page: PageId) -> [f32; 4] {
        let mut node = self.doc.get_dictionary(page).ok();
        // Bounded walk up the page tree; MediaBox is inheritable
        for _ in 0..32 {
            let Some(dict) = node else { break };
            if let Ok(array) = dict.get(b"MediaBox").and_then(|o| o.as_array()) {
                let numbers: Vec<f32> = array.iter().filter_map(|o| o.as_float().ok()).collect();
                if let [x0, y0, x1, y1] = numbers[..] {
                    if x1 > x0 && y1 > y0 {
                        return [x0, y0, x1, y1];
                    }
                }
            }
            node = dict.get(b"Parent").ok().and_then(|o| self.resolve_dict(o));
        }
        DEFAULT_MEDIA_BOX
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
        let fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(fonts
            .iter()
            .map(|(name, dict)| {
                let base_font = dict
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| strip_subset_prefix(&String::from_utf8_lossy(n)).to_string())
                    .unwrap_or_else(|| "Unknown".to_string());
                BackendFontInfo {
                    name: name.clone(),
                    base_font,
                    flags: self.font_flags(dict),
                }
            })
            .collect())
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without content is blank, not broken
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => s
                    .decompressed_content()
                    .map_err(|e| Error::PdfParse(e.to_string())),
                _ => Err(Error::Corrupted(format!(
                    "content of page {:?} is not a stream",
                    page
                ))),
            },
            Object::Array(parts) => {
                let mut content = Vec::new();
                for part in parts {
                    if let Object::Reference(r) = part {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            match s.decompressed_content() {
                                Ok(data) => {
                                    content.extend_from_slice(&data);
                                    content.push(b' ');
                                }
                                Err(e) => log::debug!("Skipping content part {:?}: {}", r, e),
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::Corrupted(format!(
                "invalid content entry on page {:?}",
                page
            ))),
        }
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn metadata(&self) -> DocumentMetadata {
        let Some(info) = self.info_dict() else {
            return DocumentMetadata::default();
        };
        DocumentMetadata {
            title: info_string(info, b"Title"),
            subject: info_string(info, b"Subject"),
        }
    }
}

fn info_string(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0x48, 0x65, 0x6C, 0x6C, 0xE9]), "Hellé");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }

    #[test]
    fn test_strip_subset_prefix() {
        assert_eq!(strip_subset_prefix("ABCDEF+Arial-Bold"), "Arial-Bold");
        assert_eq!(strip_subset_prefix("Helvetica"), "Helvetica");
        assert_eq!(strip_subset_prefix("abcdef+Odd"), "abcdef+Odd");
    }

    #[test]
    fn test_operand_numbers() {
        let op = ContentOp::new(
            "Td",
            vec![PdfValue::Integer(72), PdfValue::Real(-14.5), PdfValue::Other],
        );
        assert_eq!(op.number(0), Some(72.0));
        assert_eq!(op.number(1), Some(-14.5));
        assert_eq!(op.number(2), None);
        assert_eq!(op.number(9), None);
    }

    #[test]
    fn test_load_garbage_fails() {
        assert!(LopdfBackend::load_bytes(b"%PDF-1.4\nnot really a pdf").is_err());
    }
}
