//! # docsect
//!
//! Heading outline inference and persona-ranked section extraction for
//! PDF documents.
//!
//! The library reads positioned, styled text spans out of a document,
//! infers a title and an `H1`/`H2`/... outline from typography, carves
//! the text into heading-bounded sections, and ranks sections from a
//! batch of documents against a persona and a task.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docsect::{extract_outline, render};
//!
//! fn main() -> docsect::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!     let report = render::StructureReport::from(&outline);
//!     println!("{}", render::to_json(&report, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Stages
//!
//! - **decode**: PDF (via `lopdf`) or serialized layout JSON into raw spans
//! - **layout**: span normalization and line assembly
//! - **classify**: exclusion rules, heading strategies, title resolution
//! - **outline** / **segment**: ordered headings and section bodies
//! - **rank**: embedding similarity against a persona query
//! - **render**: JSON reports

pub mod classify;
pub mod decode;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod options;
pub mod outline;
pub mod pipeline;
pub mod rank;
pub mod render;
pub mod segment;

// Re-export commonly used types
pub use classify::{HeadingClassifier, HeadingStrategy};
pub use decode::{DecoderRegistry, LayoutDecoder};
pub use detect::InputKind;
pub use error::{Error, Result};
pub use model::{
    BoundingBox, DocumentLayout, DocumentMetadata, HeadingCandidate, HeadingLevel, Line, Outline,
    PageLayout, RankedSection, RawSpan, Section, TitleSource,
};
pub use options::{
    BoldPolicy, ClassifierOptions, PipelineOptions, RankOptions, SegmentOptions, StrategyKind,
};
pub use outline::OutlineBuilder;
pub use pipeline::{
    discover_documents, BatchResult, DocumentFailure, DocumentStructure, Pipeline,
    PipelineBuilder, ProcessedDocument,
};
pub use rank::{Embedder, HashingEmbedder, RelevanceRanker};
pub use render::{JsonFormat, PersonaReport, StructureReport};
pub use segment::SectionSegmenter;

use std::path::Path;

/// Infer the outline of a document with default options.
///
/// # Example
///
/// ```no_run
/// use docsect::extract_outline;
///
/// let outline = extract_outline("document.pdf").unwrap();
/// println!("{} ({} headings)", outline.title, outline.len());
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<Outline> {
    extract_outline_with_options(path, PipelineOptions::default())
}

/// Infer the outline of a document with custom options.
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    options: PipelineOptions,
) -> Result<Outline> {
    let pipeline = Pipeline::builder().with_options(options).build()?;
    Ok(pipeline.extract_structure(path.as_ref())?.outline)
}

/// Infer the outline of an already decoded layout with default options.
pub fn outline_from_layout(layout: &DocumentLayout) -> Result<Outline> {
    let pipeline = Pipeline::new()?;
    Ok(pipeline.structure_from_layout("", layout).outline)
}

/// Structure extraction report of a document as JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let outline = extract_outline(path)?;
    render::to_json(&StructureReport::from(&outline), format)
}

/// Extract sections from a document with default options.
pub fn extract_sections<P: AsRef<Path>>(path: P) -> Result<Vec<Section>> {
    let pipeline = Pipeline::new()?;
    Ok(pipeline.process_path(path.as_ref())?.sections)
}
