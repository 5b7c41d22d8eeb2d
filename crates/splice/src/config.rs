use crate::error::{Result, SpliceError};
use serde::{Deserialize, Serialize};

/// Configuration for splitting source units into chunks
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkPolicy {
    /// Target chunk size in lines (soft limit). A single segment larger than
    /// this still becomes one chunk, since cuts may only fall at definition
    /// boundaries.
    pub target_chunk_lines: usize,

    /// Line count above which a unit is split into chunks instead of being
    /// annotated in a single request.
    pub large_file_lines: usize,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            target_chunk_lines: 200,
            large_file_lines: 600,
        }
    }
}

impl ChunkPolicy {
    /// Validate the policy
    pub fn validate(&self) -> Result<()> {
        if self.target_chunk_lines == 0 {
            return Err(SpliceError::invalid_policy("target_chunk_lines must be > 0"));
        }
        if self.large_file_lines == 0 {
            return Err(SpliceError::invalid_policy("large_file_lines must be > 0"));
        }
        Ok(())
    }

    /// Check whether a unit of this size should be split before annotation
    #[must_use]
    pub const fn needs_split(&self, line_count: usize) -> bool {
        line_count > self.large_file_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_valid() {
        let policy = ChunkPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.target_chunk_lines, 200);
        assert_eq!(policy.large_file_lines, 600);
    }

    #[test]
    fn test_policy_validation() {
        let policy = ChunkPolicy {
            target_chunk_lines: 0,
            ..Default::default()
        };
        assert!(policy.validate().is_err());

        let policy = ChunkPolicy {
            large_file_lines: 0,
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_needs_split() {
        let policy = ChunkPolicy::default();
        assert!(!policy.needs_split(600));
        assert!(policy.needs_split(601));
        assert!(!policy.needs_split(0));
    }
}
