use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Default model used for documentation generation
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Default response budget in tokens
pub const DEFAULT_MAX_TOKENS: u32 = 8000;

/// Options controlling a single generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier sent to the service
    pub model: String,
    /// Maximum tokens the service may emit per request
    pub max_tokens: u32,
    /// Sampling temperature. Zero keeps output deterministic
    pub temperature: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.0,
        }
    }
}

impl GenerationOptions {
    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(EngineError::config("model must not be empty"));
        }
        if self.max_tokens == 0 {
            return Err(EngineError::config("max_tokens must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(EngineError::config(
                "temperature must be between 0.0 and 1.0",
            ));
        }
        Ok(())
    }
}
