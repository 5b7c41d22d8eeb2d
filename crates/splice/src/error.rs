use thiserror::Error;

/// Result type for splice operations
pub type Result<T> = std::result::Result<T, SpliceError>;

/// Errors that can occur while splitting or restoring source units
#[derive(Error, Debug)]
pub enum SpliceError {
    /// Unsupported language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Invalid chunk policy
    #[error("Invalid chunk policy: {0}")]
    InvalidPolicy(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SpliceError {
    /// Create an unsupported language error
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    /// Create an invalid policy error
    pub fn invalid_policy(msg: impl Into<String>) -> Self {
        Self::InvalidPolicy(msg.into())
    }
}
