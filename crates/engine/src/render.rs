//! Render stored documentation records into output files.
//!
//! Rendering is string templating over the store. No generation request
//! is ever issued here, which is what lets `rebuild` work offline.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use docweave_splice::Language;

use crate::cache::{DocRecord, DocStore};
use crate::error::{EngineError, Result};
use crate::layout::OutputLayout;

/// Fenced code block, tag included
static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[A-Za-z0-9_+-]*\n?.*?```").expect("valid regex"));

/// Output format for rendered documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Source files with documentation comments inserted
    Annotated,
    /// Comments-only extracts
    Comments,
    /// Per-unit Markdown plus an index
    Markdown,
}

impl OutputFormat {
    /// Parse a format name as given on the command line
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "annotated" => Ok(Self::Annotated),
            "comments" => Ok(Self::Comments),
            "markdown" => Ok(Self::Markdown),
            other => Err(EngineError::config(format!(
                "unsupported output format: {other}"
            ))),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Annotated => "annotated",
            Self::Comments => "comments",
            Self::Markdown => "markdown",
        }
    }
}

/// Keep only documentation comments from annotated source.
///
/// Fenced blocks are stripped first, then lines are kept when their
/// trimmed form starts with one of the language's comment prefixes.
/// Blank lines survive only inside a comment run.
pub fn comments_extract(language: Language, text: &str) -> String {
    let stripped = FENCED_BLOCK.replace_all(text, "");
    let mut kept: Vec<&str> = Vec::new();
    let mut in_comment_run = false;
    for line in stripped.lines() {
        let trimmed = line.trim();
        if language.is_comment_line(line) {
            kept.push(line);
            in_comment_run = true;
        } else if trimmed.is_empty() && in_comment_run {
            kept.push(line);
        } else if trimmed.starts_with("```") || trimmed.starts_with('`') {
            continue;
        } else {
            in_comment_run = false;
        }
    }
    kept.join("\n").trim().to_string()
}

/// Markdown document for one unit
pub fn markdown_document(name: &str, record: &DocRecord) -> String {
    let language = &record.structured_doc.language;
    let documentation = &record.structured_doc.documentation;
    format!("# {name}\n\nLanguage: {language}\n\n```{language}\n{documentation}\n```\n")
}

/// Markdown index listing every unit in the store
pub fn markdown_index(store: &DocStore) -> String {
    let mut out = String::from("# API Documentation\n\n## Files\n\n");
    for name in store.records().keys() {
        out.push_str(&format!("* [{name}]({name}.md)\n"));
    }
    out
}

/// Render one output format for every record in the store.
///
/// Unit names may carry directory separators; parents are created as
/// needed. Returns the written paths.
pub async fn render_store(
    store: &DocStore,
    layout: &OutputLayout,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    match format {
        OutputFormat::Annotated => {
            let dir = layout.annotated_dir();
            for (name, record) in store.records() {
                let path = dir.join(name);
                write_text(&path, &record.annotated_code).await?;
                written.push(path);
            }
        }
        OutputFormat::Comments => {
            let dir = layout.comments_dir();
            for (name, record) in store.records() {
                let path = dir.join(format!("{name}.comments"));
                write_text(&path, &record.structured_doc.documentation).await?;
                written.push(path);
            }
        }
        OutputFormat::Markdown => {
            let dir = layout.markdown_dir();
            for (name, record) in store.records() {
                let path = dir.join(format!("{name}.md"));
                write_text(&path, &markdown_document(name, record)).await?;
                written.push(path);
            }
            let index = dir.join("index.md");
            write_text(&index, &markdown_index(store)).await?;
            written.push(index);
        }
    }
    log::info!("Rendered {} {} file(s)", written.len(), format.as_str());
    Ok(written)
}

async fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut contents = text.to_string();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    tokio::fs::write(path, contents).await?;
    Ok(())
}
