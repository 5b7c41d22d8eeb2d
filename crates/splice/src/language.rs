use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Definition opener for Ruby methods, including `self.` receivers and
/// `?`/`!`/`=` suffixed names.
static RUBY_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*def\s+(?:self\s*\.\s*)?([A-Za-z_][A-Za-z0-9_]*[?!=]?)").expect("valid regex")
});

/// Definition opener for Python functions, sync or async.
static PYTHON_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:async\s+)?def\s+([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex"));

/// Definition opener for JavaScript function declarations, including exported,
/// async and generator forms. Anonymous functions carry no name to track and
/// are not openers.
static JAVASCRIPT_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\b\s*\*?\s*([A-Za-z_$][A-Za-z0-9_$]*)")
        .expect("valid regex")
});

/// Supported source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Ruby,
    Python,
    JavaScript,
    Unknown,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "rb" => Language::Ruby,
            "py" => Language::Python,
            "js" | "mjs" => Language::JavaScript,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Get language name as string (also the fence tag used in prompts)
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Ruby => "ruby",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Unknown => "unknown",
        }
    }

    /// Check if this language can go through the annotation pipeline
    pub fn is_supported(self) -> bool {
        !matches!(self, Language::Unknown)
    }

    /// Get line comment prefixes for this language
    pub fn comment_prefixes(self) -> &'static [&'static str] {
        match self {
            Language::Ruby | Language::Python => &["#"],
            Language::JavaScript => &["//", "/*", "*", "*/"],
            Language::Unknown => &[],
        }
    }

    /// Check whether a line is a comment line (leading whitespace ignored)
    pub fn is_comment_line(self, line: &str) -> bool {
        let trimmed = line.trim_start();
        self.comment_prefixes()
            .iter()
            .any(|prefix| trimmed.starts_with(prefix))
    }

    /// Extract the definition name if this line opens a definition.
    ///
    /// Detection is a leading-whitespace-then-keyword match on the single
    /// line. Block-closing keywords are never tracked, so nested definitions
    /// match like any other.
    pub fn definition_name(self, line: &str) -> Option<String> {
        let re = match self {
            Language::Ruby => &*RUBY_DEF,
            Language::Python => &*PYTHON_DEF,
            Language::JavaScript => &*JAVASCRIPT_DEF,
            Language::Unknown => return None,
        };
        re.captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}
