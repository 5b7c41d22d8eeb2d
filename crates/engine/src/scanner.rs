use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use docweave_splice::Language;

/// Scanner for finding annotatable source files in a project
pub struct SourceScanner {
    root: PathBuf,
}

impl SourceScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the root for supported source files (.gitignore aware).
    ///
    /// Paths come back relative to the root, sorted, so runs over the same
    /// tree always process units in the same order.
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true) // do not pick up hidden files by default
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);
        builder.filter_entry(move |entry| !SourceScanner::is_ignored_scope(entry.path(), &root));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > MAX_FILE_SIZE_BYTES {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                MAX_FILE_SIZE_BYTES
                            );
                            continue;
                        }
                    }

                    if !Language::from_path(path).is_supported() {
                        continue;
                    }

                    if let Ok(relative) = path.strip_prefix(&self.root) {
                        files.push(relative.to_path_buf());
                    }
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!("Found {} source files", files.len());
        files
    }

    fn is_ignored_scope(path: &Path, root: &Path) -> bool {
        if let Ok(relative) = path.strip_prefix(root) {
            for component in relative.components() {
                if let std::path::Component::Normal(name) = component {
                    let lowered = name.to_string_lossy().to_lowercase();
                    if IGNORED_SCOPES.iter().any(|ignored| ignored == &lowered) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

const IGNORED_SCOPES: &[&str] = &[
    // VCS / tooling
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    // dependency trees
    "node_modules",
    "vendor",
    ".bundle",
    ".venv",
    "venv",
    "__pycache__",
    // builds / scratch
    "build",
    "dist",
    "coverage",
    "target",
    "tmp",
    "log",
    "logs",
];

const MAX_FILE_SIZE_BYTES: u64 = 1_048_576; // 1 MB

#[cfg(test)]
mod tests {
    use super::SourceScanner;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn finds_only_supported_sources() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("main.rb"), b"def main\nend\n").unwrap();
        fs::write(temp.path().join("util.py"), b"def util():\n    pass\n").unwrap();
        fs::write(temp.path().join("app.js"), b"function app() {}\n").unwrap();
        fs::write(temp.path().join("README.md"), b"# readme\n").unwrap();
        fs::write(temp.path().join("data.json"), b"{}").unwrap();

        let files = SourceScanner::new(temp.path()).scan();

        assert_eq!(
            files,
            vec![
                PathBuf::from("app.js"),
                PathBuf::from("main.rb"),
                PathBuf::from("util.py"),
            ]
        );
    }

    #[test]
    fn skips_dependency_directories() {
        let temp = tempdir().unwrap();
        let node_modules = temp.path().join("node_modules").join("pkg");
        fs::create_dir_all(&node_modules).unwrap();
        fs::write(node_modules.join("index.js"), b"module.exports = {};\n").unwrap();
        let vendor = temp.path().join("vendor");
        fs::create_dir_all(&vendor).unwrap();
        fs::write(vendor.join("gem.rb"), b"def gem\nend\n").unwrap();
        fs::write(temp.path().join("lib.rb"), b"def lib\nend\n").unwrap();

        let files = SourceScanner::new(temp.path()).scan();

        assert_eq!(files, vec![PathBuf::from("lib.rb")]);
    }

    #[test]
    fn skips_oversized_files() {
        let temp = tempdir().unwrap();
        let big = "# filler\n".repeat(200_000); // well past the 1 MB cap
        fs::write(temp.path().join("big.rb"), big).unwrap();
        fs::write(temp.path().join("small.rb"), b"def tiny\nend\n").unwrap();

        let files = SourceScanner::new(temp.path()).scan();

        assert_eq!(files, vec![PathBuf::from("small.rb")]);
    }

    #[test]
    fn returns_sorted_relative_paths() {
        let temp = tempdir().unwrap();
        let sub = temp.path().join("lib");
        fs::create_dir_all(&sub).unwrap();
        fs::write(temp.path().join("zeta.rb"), b"def z\nend\n").unwrap();
        fs::write(temp.path().join("alpha.rb"), b"def a\nend\n").unwrap();
        fs::write(sub.join("core.py"), b"def c():\n    pass\n").unwrap();

        let files = SourceScanner::new(temp.path()).scan();

        assert_eq!(
            files,
            vec![
                PathBuf::from("alpha.rb"),
                PathBuf::from("lib/core.py"),
                PathBuf::from("zeta.rb"),
            ]
        );
    }
}
