//! Directory layout of one documentation run.

use chrono::Local;
use std::path::{Path, PathBuf};

use crate::cache::DOC_STORE_FILE_NAME;

const RUN_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Where a run keeps its store and rendered outputs.
///
/// A fresh run gets a timestamped directory under the output base, so
/// repeated runs never clobber each other. Rebuilds reuse an existing
/// run directory as-is.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Layout for a fresh run: `<base>/<YYYYMMDD_HHMMSS>`
    pub fn for_run(base: impl AsRef<Path>) -> Self {
        let stamp = Local::now().format(RUN_STAMP_FORMAT).to_string();
        Self {
            root: base.as_ref().join(stamp),
        }
    }

    /// Layout over an existing run directory
    pub fn at(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.root.join(DOC_STORE_FILE_NAME)
    }

    #[must_use]
    pub fn comments_dir(&self) -> PathBuf {
        self.root.join("comments")
    }

    #[must_use]
    pub fn markdown_dir(&self) -> PathBuf {
        self.root.join("markdown")
    }

    #[must_use]
    pub fn annotated_dir(&self) -> PathBuf {
        self.root.join("annotated")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_run_gets_timestamped_root() {
        let layout = OutputLayout::for_run("documentation");
        let name = layout
            .root()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap()
            .to_string();
        assert_eq!(name.len(), 15);
        assert_eq!(name.as_bytes()[8], b'_');
        assert!(name
            .chars()
            .enumerate()
            .all(|(i, c)| i == 8 || c.is_ascii_digit()));
        assert!(layout.root().starts_with("documentation"));
    }

    #[test]
    fn test_existing_root_is_kept() {
        let layout = OutputLayout::at("documentation/20250102_030405");
        assert_eq!(
            layout.root(),
            Path::new("documentation/20250102_030405")
        );
        assert_eq!(
            layout.store_path(),
            Path::new("documentation/20250102_030405/raw_documentation.json")
        );
        assert_eq!(
            layout.annotated_dir(),
            Path::new("documentation/20250102_030405/annotated")
        );
        assert_eq!(
            layout.comments_dir(),
            Path::new("documentation/20250102_030405/comments")
        );
        assert_eq!(
            layout.markdown_dir(),
            Path::new("documentation/20250102_030405/markdown")
        );
    }
}
