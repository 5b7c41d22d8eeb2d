//! Sequential annotation pipeline over source units.
//!
//! Units are processed one at a time and chunks strictly in order, each
//! request awaited before the next. A unit that fails to read is skipped
//! and reported; it never takes the batch down with it.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use docweave_splice::{
    reassemble, verify_definitions, whole_unit_chunk, ChunkPolicy, Language, SourceUnit, Splitter,
};

use crate::annotator::{AnnotationOutcome, ChunkAnnotator};
use crate::cache::{DocRecord, DocStore, StructuredDoc};
use crate::client::TextGenerator;
use crate::config::GenerationOptions;
use crate::error::{EngineError, Result};
use crate::layout::OutputLayout;
use crate::render::comments_extract;
use crate::scanner::SourceScanner;

/// Verified output below this share of the original line count raises a
/// shrink warning
const SHRINK_RATIO: f64 = 0.9;

/// Report for one unit's pass through the pipeline
#[derive(Debug, Clone, Serialize)]
pub struct UnitReport {
    pub name: String,
    pub language: String,
    pub chunks: usize,
    pub fallback_chunks: usize,
    pub restored: Vec<String>,
    pub shrink_warning: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UnitReport {
    fn failed(name: String, language: Language, error: String) -> Self {
        Self {
            name,
            language: language.as_str().to_string(),
            chunks: 0,
            fallback_chunks: 0,
            restored: Vec::new(),
            shrink_warning: false,
            error: Some(error),
        }
    }
}

/// Summary across all units of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub units: Vec<UnitReport>,
}

impl RunSummary {
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.units.iter().filter(|u| u.error.is_some()).count()
    }

    #[must_use]
    pub fn fallback_chunk_count(&self) -> usize {
        self.units.iter().map(|u| u.fallback_chunks).sum()
    }

    #[must_use]
    pub fn restored_count(&self) -> usize {
        self.units.iter().map(|u| u.restored.len()).sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Units: {} | Failed: {} | Fallback chunks: {} | Restored definitions: {}",
            self.unit_count(),
            self.failed_count(),
            self.fallback_chunk_count(),
            self.restored_count()
        )
    }
}

/// Product of one unit's annotation
#[derive(Debug, Clone)]
pub struct AnnotatedUnit {
    pub record: DocRecord,
    pub report: UnitReport,
}

/// Drives scanning, chunking, annotation, reassembly and persistence
pub struct DocPipeline {
    generator: Box<dyn TextGenerator>,
    splitter: Splitter,
    options: GenerationOptions,
}

impl DocPipeline {
    /// Create a pipeline. Fails when the chunk policy or the generation
    /// options are unusable.
    pub fn new(
        generator: Box<dyn TextGenerator>,
        policy: ChunkPolicy,
        options: GenerationOptions,
    ) -> Result<Self> {
        policy.validate()?;
        options.validate()?;
        Ok(Self {
            generator,
            splitter: Splitter::new(policy),
            options,
        })
    }

    /// Annotate one in-memory unit end to end.
    ///
    /// An empty unit issues no requests and yields an empty annotation.
    pub async fn annotate_unit(&self, unit: &SourceUnit) -> AnnotatedUnit {
        let line_count = unit.line_count();
        let chunks = if unit.text.is_empty() {
            Vec::new()
        } else if self.splitter.policy().needs_split(line_count) {
            self.splitter.split(unit)
        } else {
            vec![whole_unit_chunk(unit)]
        };
        log::info!(
            "Annotating {} ({} lines, {} chunk(s))",
            unit.name,
            line_count,
            chunks.len()
        );

        let annotator = ChunkAnnotator::new(self.generator.as_ref(), &self.options);
        let mut annotated_parts = Vec::with_capacity(chunks.len());
        let mut raw_responses = Vec::new();
        let mut fallback_chunks = 0usize;

        for chunk in &chunks {
            match annotator.annotate(&unit.name, unit.language, chunk).await {
                AnnotationOutcome::Generated { text, raw } => {
                    annotated_parts.push(text);
                    raw_responses.push(raw);
                }
                AnnotationOutcome::Fallback { .. } => {
                    fallback_chunks += 1;
                    annotated_parts.push(chunk.text.clone());
                }
            }
        }

        let reassembled = reassemble(&annotated_parts);
        let verified = verify_definitions(unit, &reassembled);

        let verified_lines = verified.text.lines().count();
        let shrink_warning =
            line_count > 0 && (verified_lines as f64) < (line_count as f64) * SHRINK_RATIO;
        if shrink_warning {
            log::warn!(
                "{}: annotated output is {} lines, under 90% of the original {}",
                unit.name,
                verified_lines,
                line_count
            );
        }

        let documentation = comments_extract(unit.language, &verified.text);
        let record = DocRecord {
            generated_text: raw_responses.join("\n\n"),
            structured_doc: StructuredDoc {
                language: unit.language.as_str().to_string(),
                documentation,
            },
            annotated_code: verified.text,
            original_code: unit.text.clone(),
        };
        let report = UnitReport {
            name: unit.name.clone(),
            language: unit.language.as_str().to_string(),
            chunks: chunks.len(),
            fallback_chunks,
            restored: verified.restored,
            shrink_warning,
            error: None,
        };
        log::info!("Completed {}", report.name);
        AnnotatedUnit { record, report }
    }

    /// Annotate an ad-hoc fragment, such as code read from stdin.
    ///
    /// The language comes from the synthetic name's extension.
    pub async fn annotate_fragment(&self, name: &str, text: &str) -> AnnotatedUnit {
        let unit = SourceUnit::new(name, Language::from_path(name), text);
        self.annotate_unit(&unit).await
    }

    /// Run over a file or directory, persisting each unit's record into the
    /// store as it completes. Returns the populated store and the summary.
    pub async fn run(&self, input: &Path, layout: &OutputLayout) -> Result<(DocStore, RunSummary)> {
        if !input.exists() {
            return Err(EngineError::invalid_path(format!(
                "{} does not exist",
                input.display()
            )));
        }

        let store_path = layout.store_path();
        let mut store = DocStore::load(&store_path).await?;
        let mut summary = RunSummary::default();

        if input.is_dir() {
            let scanner = SourceScanner::new(input);
            for relative in scanner.scan() {
                let name = relative.to_string_lossy().to_string();
                let absolute = input.join(&relative);
                let report = match SourceUnit::read_with_name(&absolute, name.clone()) {
                    Ok(unit) => {
                        let annotated = self.annotate_unit(&unit).await;
                        store.insert(name, annotated.record);
                        store.save(&store_path).await?;
                        annotated.report
                    }
                    Err(err) => {
                        log::error!("Skipping {}: {err}", absolute.display());
                        UnitReport::failed(name, Language::from_path(&absolute), err.to_string())
                    }
                };
                summary.units.push(report);
            }
        } else {
            let unit = SourceUnit::read(input)?;
            let annotated = self.annotate_unit(&unit).await;
            store.insert(unit.name.clone(), annotated.record);
            store.save(&store_path).await?;
            summary.units.push(annotated.report);
        }

        Ok((store, summary))
    }
}
