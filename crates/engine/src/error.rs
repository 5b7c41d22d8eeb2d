use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while driving the annotation pipeline
#[derive(Error, Debug)]
pub enum EngineError {
    /// Input path is missing or not usable
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The generation service rejected the credentials
    #[error("Authentication failed: check DOCWEAVE_API_KEY")]
    AuthError,

    /// The generation service asked us to slow down
    #[error("Rate limited by the generation service")]
    RateLimited,

    /// Any other non-success status from the generation service
    #[error("Generation service error ({status}): {message}")]
    ServiceError { status: u16, message: String },

    /// The generation service returned no text
    #[error("Empty response from the generation service")]
    EmptyResponse,

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Error from the splitting/restore core
    #[error(transparent)]
    SpliceError(#[from] docweave_splice::SpliceError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Persisted store was written by an incompatible version
    #[error("Unsupported store schema_version {found} (expected {expected})")]
    SchemaVersion { found: u32, expected: u32 },
}

impl EngineError {
    /// Create an invalid path error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a service error
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::ServiceError {
            status,
            message: message.into(),
        }
    }
}
