//! Error types for docsect library.

use std::io;
use thiserror::Error;

/// Result type alias for docsect operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while decoding, classifying, or ranking.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized by any registered decoder.
    #[error("Unknown file format: {0}")]
    UnknownFormat(String),

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// The PDF structure is corrupted or malformed.
    #[error("Corrupted PDF structure: {0}")]
    Corrupted(String),

    /// A serialized layout could not be read.
    #[error("Layout JSON error: {0}")]
    LayoutJson(#[from] serde_json::Error),

    /// A configured rule pattern failed to compile.
    #[error("Invalid pattern for rule '{name}': {source}")]
    InvalidPattern {
        /// Rule name the pattern belongs to
        name: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The embedding collaborator failed or broke its contract.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Error during report rendering.
    #[error("Rendering error: {0}")]
    Render(String),

    /// No input documents were found.
    #[error("No input documents found in {0}")]
    NoInputDocuments(String),

    /// No document in a batch produced a section to rank.
    #[error("No sections found in any document in {0}")]
    NoSections(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error invalidates a whole batch rather than one document.
    ///
    /// Ranking needs every section in one vector space, so an embedding
    /// failure is never recoverable per document.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, Error::Embedding(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::NoSections("docs".to_string());
        assert_eq!(err.to_string(), "No sections found in any document in docs");
        assert!(!err.is_batch_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_batch_fatal());
    }

    #[test]
    fn test_embedding_error_is_batch_fatal() {
        let err = Error::Embedding("model unavailable".to_string());
        assert!(err.is_batch_fatal());
        assert_eq!(err.to_string(), "Embedding error: model unavailable");
    }

    #[test]
    fn test_invalid_pattern_display() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = Error::InvalidPattern {
            name: "page-number".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid pattern for rule 'page-number'"));
    }
}
