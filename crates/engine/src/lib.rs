//! # Docweave Engine
//!
//! Orchestration of LLM-backed documentation runs.
//!
//! ## Pipeline
//!
//! ```text
//! File or directory
//!     │
//!     ├──> Scanner (.gitignore aware)
//!     │      └─> Source units
//!     │
//!     ├──> Splitter (boundary safe, large units only)
//!     │      └─> Chunks
//!     │
//!     ├──> Chunk Annotator (one awaited request per chunk)
//!     │      └─> Annotated parts, original text on failure
//!     │
//!     ├──> Reassembly + integrity repair
//!     │      └─> Annotated source unit
//!     │
//!     └──> Store + renderers
//!            └─> raw_documentation.json, annotated/, comments/, markdown/
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use docweave_engine::{DocPipeline, GenerationOptions, OutputLayout, StubGenerator};
//! use docweave_splice::ChunkPolicy;
//!
//! #[tokio::main]
//! async fn main() -> docweave_engine::Result<()> {
//!     let pipeline = DocPipeline::new(
//!         Box::new(StubGenerator),
//!         ChunkPolicy::default(),
//!         GenerationOptions::default(),
//!     )?;
//!     let layout = OutputLayout::for_run("documentation");
//!     let (store, summary) = pipeline.run("src".as_ref(), &layout).await?;
//!
//!     println!("{summary}");
//!     println!("{} unit(s) stored in {}", store.len(), layout.root().display());
//!     Ok(())
//! }
//! ```

mod annotator;
mod cache;
mod client;
mod config;
mod error;
mod layout;
mod pipeline;
mod prompt;
mod render;
mod scanner;

pub use annotator::{AnnotationOutcome, ChunkAnnotator};
pub use cache::{DocRecord, DocStore, StructuredDoc, DOC_STORE_FILE_NAME, DOC_STORE_SCHEMA_VERSION};
pub use client::{
    generator_from_env, AnthropicClient, GenerateRequest, GeneratorMode, Message, StubGenerator,
    TextGenerator, API_KEY_ENV, API_KEY_FALLBACK_ENV, BASE_URL_ENV, GENERATOR_MODE_ENV,
};
pub use config::{GenerationOptions, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
pub use error::{EngineError, Result};
pub use layout::OutputLayout;
pub use pipeline::{AnnotatedUnit, DocPipeline, RunSummary, UnitReport};
pub use prompt::{annotation_request, SYSTEM_PROMPT};
pub use render::{
    comments_extract, markdown_document, markdown_index, render_store, OutputFormat,
};
pub use scanner::SourceScanner;
