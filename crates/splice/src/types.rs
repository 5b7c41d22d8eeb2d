use crate::error::{Result, SpliceError};
use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A source file held in memory for annotation.
///
/// Immutable once read. The name identifies the unit in reports and in the
/// documentation store: the bare file name for single-file runs, the
/// root-relative path for directory runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: String,
    pub language: Language,
    pub text: String,
}

impl SourceUnit {
    /// Create a unit from in-memory text
    pub fn new(name: impl Into<String>, language: Language, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language,
            text: text.into(),
        }
    }

    /// Read a unit from disk, deriving name and language from the path
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Self::read_with_name(path, name)
    }

    /// Read a unit from disk with an explicit name
    pub fn read_with_name(path: impl AsRef<Path>, name: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let language = Language::from_path(path);
        if !language.is_supported() {
            return Err(SpliceError::unsupported_language(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("none"),
            ));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(name, language, text))
    }

    /// Number of lines in the unit
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

/// Location of a definition opener within a source unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    /// Definition name as written in the source
    pub name: String,

    /// Zero-based index of the opener line
    pub line: usize,
}

impl Boundary {
    #[must_use]
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
        }
    }
}

/// A contiguous span of source lines sent for annotation as one request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// The lines of this chunk joined with newlines
    pub text: String,
}

impl Chunk {
    /// Create a new chunk
    #[must_use]
    pub const fn new(start_line: usize, end_line: usize, text: String) -> Self {
        Self {
            start_line,
            end_line,
            text,
        }
    }

    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}
