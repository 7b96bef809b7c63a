//! Report rendering.
//!
//! Outlines become [`StructureReport`]s, ranked sections become a
//! [`PersonaReport`]; both serialize through [`to_json`].

mod json;
mod report;
mod text;

pub use json::{to_json, JsonFormat};
pub use report::{
    ExtractedSection, OutlineEntry, PersonaReport, ReportMetadata, StructureReport,
    SubsectionAnalysis,
};
pub use text::outline_to_text;
