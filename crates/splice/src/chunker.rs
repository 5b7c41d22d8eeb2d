use crate::boundary;
use crate::config::ChunkPolicy;
use crate::language::Language;
use crate::types::{Chunk, SourceUnit};

/// Splits source units into chunks that can be annotated independently.
///
/// Cut points fall only immediately before a definition opener, or before the
/// contiguous comment block sitting directly above one, so a definition and
/// its lead comments are never separated. Lines between consecutive openers
/// form segments; segments are packed greedily into chunks that stay within
/// the target size whenever a boundary allows it. A single segment larger
/// than the target becomes one oversized chunk.
pub struct Splitter {
    policy: ChunkPolicy,
}

impl Splitter {
    /// Create a new splitter with the given policy
    #[must_use]
    pub fn new(policy: ChunkPolicy) -> Self {
        policy.validate().expect("Invalid chunk policy provided");
        Self { policy }
    }

    /// Split a source unit into chunks
    pub fn split(&self, unit: &SourceUnit) -> Vec<Chunk> {
        self.split_text(unit.language, &unit.text)
    }

    /// Split raw text with an explicit language
    pub fn split_text(&self, language: Language, text: &str) -> Vec<Chunk> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() {
            return Vec::new();
        }

        let starts = segment_starts(language, &lines);
        let target = self.policy.target_chunk_lines;

        let mut chunks = Vec::new();
        let mut buf_start = 0;
        let mut buf_len = 0;

        for (i, &seg_start) in starts.iter().enumerate() {
            let seg_end = starts.get(i + 1).copied().unwrap_or(lines.len());
            let seg_len = seg_end - seg_start;
            if seg_len == 0 {
                continue;
            }

            if buf_len > 0 && buf_len + seg_len > target {
                chunks.push(make_chunk(&lines, buf_start, buf_start + buf_len));
                buf_start = seg_start;
                buf_len = seg_len;
            } else {
                buf_len += seg_len;
            }
        }

        if buf_len > 0 {
            chunks.push(make_chunk(&lines, buf_start, buf_start + buf_len));
        }

        chunks
    }

    /// Get the policy
    #[must_use]
    pub const fn policy(&self) -> &ChunkPolicy {
        &self.policy
    }

    /// Get statistics about a split
    #[must_use]
    pub fn stats(chunks: &[Chunk]) -> SplitStats {
        SplitStats {
            total_chunks: chunks.len(),
            total_lines: chunks.iter().map(Chunk::line_count).sum(),
            min_lines: chunks.iter().map(Chunk::line_count).min().unwrap_or(0),
            max_lines: chunks.iter().map(Chunk::line_count).max().unwrap_or(0),
        }
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new(ChunkPolicy::default())
    }
}

/// The whole unit as a single chunk, used when a unit stays under the
/// large-file threshold.
#[must_use]
pub fn whole_unit_chunk(unit: &SourceUnit) -> Chunk {
    let count = unit.line_count();
    Chunk::new(1, count.max(1), unit.text.clone())
}

/// Segment start indices: the top of the file plus each opener's lead start.
///
/// Lead starts are strictly increasing across boundaries because an opener
/// line is never itself a comment line; the guard only drops a first boundary
/// that already sits at the top.
fn segment_starts(language: Language, lines: &[&str]) -> Vec<usize> {
    let mut starts = vec![0];
    for b in boundary::scan_boundary_lines(language, lines) {
        let lead = boundary::comment_lead_start(language, lines, b.line);
        if lead > *starts.last().unwrap_or(&0) {
            starts.push(lead);
        }
    }
    starts
}

fn make_chunk(lines: &[&str], start: usize, end: usize) -> Chunk {
    Chunk::new(start + 1, end, lines[start..end].join("\n"))
}

/// Statistics about a split
#[derive(Debug, Clone)]
pub struct SplitStats {
    pub total_chunks: usize,
    pub total_lines: usize,
    pub min_lines: usize,
    pub max_lines: usize,
}

impl std::fmt::Display for SplitStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} | Lines: {} | Range: {}-{}",
            self.total_chunks, self.total_lines, self.min_lines, self.max_lines
        )
    }
}
