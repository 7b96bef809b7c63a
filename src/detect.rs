//! Input format sniffing.
//!
//! Decoders are picked by file extension first; when a file has no usable
//! extension, its leading bytes decide.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3;
const SNIFF_LEN: usize = 64;

/// Input kinds the crate can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A PDF file
    Pdf,
    /// A serialized [`crate::model::DocumentLayout`]
    LayoutJson,
}

impl InputKind {
    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            InputKind::Pdf => "pdf",
            InputKind::LayoutJson => "json",
        }
    }
}

/// Validate a `%PDF-x.y` header and return the version.
pub fn pdf_version(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat("missing %PDF- header".to_string()));
    }

    let version = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(String::from_utf8_lossy(version).into_owned())
        }
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).into_owned(),
        )),
    }
}

/// Guess the input kind from leading bytes.
pub fn sniff_bytes(data: &[u8]) -> Option<InputKind> {
    if data.starts_with(PDF_MAGIC) {
        return Some(InputKind::Pdf);
    }
    let body = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    match body.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => Some(InputKind::LayoutJson),
        _ => None,
    }
}

/// Guess the input kind of a file from its leading bytes.
pub fn sniff_path<P: AsRef<Path>>(path: P) -> Result<Option<InputKind>> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)?;
    Ok(sniff_bytes(&head))
}
