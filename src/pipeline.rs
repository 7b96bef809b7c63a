//! End-to-end pipeline: decode, classify, segment, rank.
//!
//! Each document runs through decode -> normalize -> assemble -> classify ->
//! outline -> segment on its own; a batch may do that in parallel. Ranking
//! always sees the pooled sections of the whole batch.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::classify::{HeadingClassifier, HeadingStrategy};
use crate::decode::DecoderRegistry;
use crate::error::{Error, Result};
use crate::layout::analyze_layout;
use crate::model::{DocumentLayout, Line, Outline, RankedSection, Section};
use crate::options::PipelineOptions;
use crate::outline::OutlineBuilder;
use crate::rank::{Embedder, HashingEmbedder, RelevanceRanker};
use crate::render::{PersonaReport, StructureReport};
use crate::segment::SectionSegmenter;

/// Title, outline, and line stream of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStructure {
    /// Document identifier (file name)
    pub document: String,
    /// Inferred outline
    pub outline: Outline,
    /// Every line of the document, in reading order
    pub lines: Vec<Line>,
}

impl DocumentStructure {
    /// Resolved title.
    pub fn title(&self) -> &str {
        &self.outline.title
    }

    /// Structure extraction report.
    pub fn report(&self) -> StructureReport {
        StructureReport::from(&self.outline)
    }
}

/// A document carried through segmentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDocument {
    pub structure: DocumentStructure,
    pub sections: Vec<Section>,
}

/// A document the batch skipped.
#[derive(Debug)]
pub struct DocumentFailure {
    /// Document identifier
    pub document: String,
    /// Why it failed
    pub error: Error,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Every input, in input order
    pub inputs: Vec<String>,
    /// Documents that made it through segmentation, in input order
    pub documents: Vec<ProcessedDocument>,
    /// Documents that failed, in input order
    pub failures: Vec<DocumentFailure>,
}

impl BatchResult {
    /// Sections of every document, pooled in input order.
    pub fn sections(&self) -> Vec<Section> {
        self.documents
            .iter()
            .flat_map(|d| d.sections.iter().cloned())
            .collect()
    }

    /// Total number of sections.
    pub fn section_count(&self) -> usize {
        self.documents.iter().map(|d| d.sections.len()).sum()
    }

    /// Whether every document failed or there were none.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Document identifier for a path: its file name.
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Supported files directly inside `dir`, sorted by file name.
pub fn discover_documents(dir: &Path, registry: &DecoderRegistry) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && registry.supports_path(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Builder for [`Pipeline`].
pub struct PipelineBuilder {
    options: PipelineOptions,
    registry: Option<DecoderRegistry>,
    embedder: Option<Box<dyn Embedder>>,
    strategy: Option<Box<dyn HeadingStrategy>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            options: PipelineOptions::default(),
            registry: None,
            embedder: None,
            strategy: None,
        }
    }

    /// Set all options.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a custom decoder registry.
    pub fn with_registry(mut self, registry: DecoderRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Use a custom embedding model.
    pub fn with_embedder(mut self, embedder: Box<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Override the heading strategy chosen in the options.
    pub fn with_strategy(mut self, strategy: Box<dyn HeadingStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Process batch documents one at a time.
    pub fn sequential(mut self) -> Self {
        self.options.parallel = false;
        self
    }

    /// Validate options and build the pipeline.
    pub fn build(self) -> Result<Pipeline> {
        self.options.validate()?;

        let mut classifier = HeadingClassifier::new(&self.options.classifier)?;
        if let Some(strategy) = self.strategy {
            classifier = classifier.with_strategy(strategy);
        }
        let embedder = self
            .embedder
            .unwrap_or_else(|| Box::new(HashingEmbedder::new()));

        Ok(Pipeline {
            registry: self.registry.unwrap_or_default(),
            classifier,
            segmenter: SectionSegmenter::new(self.options.segment.clone()),
            ranker: RelevanceRanker::new(embedder).with_options(self.options.rank.clone()),
            outline: OutlineBuilder::new(),
            options: self.options,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Outline inference and persona ranking over documents.
///
/// # Example
///
/// ```no_run
/// use docsect::Pipeline;
/// use std::path::PathBuf;
///
/// fn main() -> docsect::Result<()> {
///     let pipeline = Pipeline::new()?;
///     let batch = pipeline.process_batch(&[PathBuf::from("guide.pdf")]);
///     let ranked = pipeline.rank_batch(&batch, "Travel planner", "plan a 4-day trip")?;
///     for section in ranked.iter().take(5) {
///         println!("{} {}", section.rank, section.section.heading);
///     }
///     Ok(())
/// }
/// ```
pub struct Pipeline {
    options: PipelineOptions,
    registry: DecoderRegistry,
    classifier: HeadingClassifier,
    outline: OutlineBuilder,
    segmenter: SectionSegmenter,
    ranker: RelevanceRanker,
}

impl Pipeline {
    /// Pipeline with default options, decoders, and the hashing embedder.
    pub fn new() -> Result<Self> {
        PipelineBuilder::new().build()
    }

    /// Start a builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Options in use.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Decoder registry in use.
    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    /// Infer the outline of an already decoded document.
    pub fn structure_from_layout(&self, document: &str, layout: &DocumentLayout) -> DocumentStructure {
        let lines = analyze_layout(layout);
        let classification = self.classifier.classify(&lines, &layout.metadata);
        let outline = self.outline.build(classification);
        log::debug!(
            "{}: {} lines, {} headings, title {:?} ({:?})",
            document,
            lines.len(),
            outline.len(),
            outline.title,
            outline.title_source
        );

        DocumentStructure {
            document: document.to_string(),
            outline,
            lines,
        }
    }

    /// Decode a file and infer its outline.
    pub fn extract_structure(&self, path: &Path) -> Result<DocumentStructure> {
        let layout = self.registry.decode_path(path)?;
        Ok(self.structure_from_layout(&document_id(path), &layout))
    }

    /// Carve a document into heading-bounded sections.
    pub fn segment(&self, structure: &DocumentStructure) -> Vec<Section> {
        self.segmenter
            .segment(&structure.document, &structure.outline, &structure.lines)
    }

    /// Outline and sections of an already decoded document.
    pub fn process_layout(&self, document: &str, layout: &DocumentLayout) -> ProcessedDocument {
        let structure = self.structure_from_layout(document, layout);
        let sections = self.segment(&structure);
        ProcessedDocument {
            structure,
            sections,
        }
    }

    /// Decode, classify, and segment one file.
    pub fn process_path(&self, path: &Path) -> Result<ProcessedDocument> {
        let layout = self.registry.decode_path(path)?;
        let processed = self.process_layout(&document_id(path), &layout);
        log::info!(
            "Processed {}: {} headings, {} sections",
            processed.structure.document,
            processed.structure.outline.len(),
            processed.sections.len()
        );
        Ok(processed)
    }

    /// Process every path; failures are recorded, not fatal.
    ///
    /// Results keep input order whether or not the batch runs in parallel.
    pub fn process_batch(&self, paths: &[PathBuf]) -> BatchResult {
        let outcomes: Vec<Result<ProcessedDocument>> = if self.options.parallel {
            paths.par_iter().map(|p| self.process_path(p)).collect()
        } else {
            paths.iter().map(|p| self.process_path(p)).collect()
        };

        let mut batch = BatchResult {
            inputs: paths.iter().map(|p| document_id(p)).collect(),
            ..BatchResult::default()
        };
        for (path, outcome) in paths.iter().zip(outcomes) {
            match outcome {
                Ok(doc) => batch.documents.push(doc),
                Err(error) => {
                    let document = document_id(path);
                    log::warn!("Skipping {}: {}", document, error);
                    batch.failures.push(DocumentFailure { document, error });
                }
            }
        }
        batch
    }

    /// Rank every section of the batch against persona and task.
    pub fn rank_batch(
        &self,
        batch: &BatchResult,
        persona: &str,
        task: &str,
    ) -> Result<Vec<RankedSection>> {
        log::info!(
            "Ranking {} sections from {} documents with {}",
            batch.section_count(),
            batch.documents.len(),
            self.ranker.embedder_name()
        );
        self.ranker.rank(batch.sections(), persona, task)
    }

    /// Rank the batch and assemble the top-K persona report.
    pub fn persona_report(
        &self,
        batch: &BatchResult,
        persona: &str,
        task: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<PersonaReport> {
        let ranked = self.rank_batch(batch, persona, task)?;
        Ok(PersonaReport::build(
            batch.inputs.clone(),
            persona,
            task,
            &ranked,
            self.options.rank.top_k,
            timestamp,
        ))
    }
}
