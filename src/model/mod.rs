//! Data model shared by every pipeline stage.
//!
//! Layout types come from the decoder; spans and lines are derived by the
//! layout stage; headings, outlines, and sections are produced by the
//! classifier, outline builder, and segmenter.

mod layout;
mod line;
mod outline;
mod section;

pub use layout::{BoundingBox, DocumentLayout, DocumentMetadata, PageLayout, RawSpan, BOLD_FLAG};
pub use line::{from_tenths, round_tenth, to_tenths, Line, Span};
pub use outline::{HeadingCandidate, HeadingLevel, Outline, TitleSource};
pub use section::{RankedSection, Section};
