//! # Docweave Splice
//!
//! Chunk-safe splitting and lossless reassembly of source files around
//! generated documentation.
//!
//! ## Philosophy
//!
//! A documentation pass may rewrite comments, but it must never lose code.
//! Splice treats source text as lines, cuts only where a definition begins,
//! and checks every definition name on the way back in:
//! - Cut points fall immediately before a definition opener, never inside one
//! - Comments sitting directly above a definition travel with it
//! - Chunks partition the unit exactly; reassembly restores line order
//! - Definitions missing after annotation are re-appended from the original
//!
//! ## Architecture
//!
//! ```text
//! Source Unit
//!     │
//!     ├──> Boundary Scan (keyword openers, no nesting)
//!     │
//!     ├──> Split → Chunk[] (greedy packing toward the target size)
//!     │
//!     │         per-chunk annotation happens elsewhere
//!     │
//!     ├──> Extract (fenced block or salvage filter)
//!     │
//!     └──> Reassemble + Verify
//!          ├─> join chunks in order
//!          └─> append any definition that went missing
//! ```
//!
//! ## Example
//!
//! ```rust
//! use docweave_splice::{ChunkPolicy, Language, Splitter};
//!
//! let splitter = Splitter::new(ChunkPolicy::default());
//! let code = "# Adds one\ndef inc(x)\n  x + 1\nend\n";
//!
//! let chunks = splitter.split_text(Language::Ruby, code);
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].start_line, 1);
//! ```

mod boundary;
mod chunker;
mod config;
mod error;
mod extract;
mod language;
mod restore;
mod types;

pub use boundary::{comment_lead_start, scan_boundaries, scan_boundary_lines};
pub use chunker::{whole_unit_chunk, SplitStats, Splitter};
pub use config::ChunkPolicy;
pub use error::{Result, SpliceError};
pub use extract::extract_source_block;
pub use language::Language;
pub use restore::{reassemble, verify_definitions, VerifiedUnit};
pub use types::{Boundary, Chunk, SourceUnit};
