//! Client for the Anthropic messages API plus an offline stub generator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use docweave_splice::extract_source_block;

use crate::config::GenerationOptions;
use crate::error::{EngineError, Result};

/// Primary environment variable holding the API key
pub const API_KEY_ENV: &str = "DOCWEAVE_API_KEY";

/// Fallback environment variable holding the API key
pub const API_KEY_FALLBACK_ENV: &str = "ANTHROPIC_API_KEY";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "DOCWEAVE_BASE_URL";

/// Environment variable selecting the generator backend
pub const GENERATOR_MODE_ENV: &str = "DOCWEAVE_GENERATOR_MODE";

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Longest service error body kept in an error message
const MAX_ERROR_BODY: usize = 400;

/// A single message in a generation conversation
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Request payload for the messages endpoint
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Message>,
}

impl GenerateRequest {
    /// Create a request from generation options with no messages yet
    pub fn from_options(options: &GenerationOptions) -> Self {
        Self {
            model: options.model.clone(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            system: None,
            messages: Vec::new(),
        }
    }

    /// Set the system prompt
    #[must_use]
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Append a message to the conversation
    #[must_use]
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

/// Backend that turns a generation request into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<String>;
}

/// HTTP client for the Anthropic messages API
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    /// Create a client against the default API endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom API endpoint
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(EngineError::config("API key must not be empty"));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the environment.
    ///
    /// Reads the key from `DOCWEAVE_API_KEY`, falling back to
    /// `ANTHROPIC_API_KEY`, and honors `DOCWEAVE_BASE_URL` when set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .or_else(|_| std::env::var(API_KEY_FALLBACK_ENV))
            .map_err(|_| {
                EngineError::config(format!(
                    "no API key found: set {API_KEY_ENV} or {API_KEY_FALLBACK_ENV}"
                ))
            })?;
        match std::env::var(BASE_URL_ENV) {
            Ok(base_url) => Self::with_base_url(api_key, base_url),
            Err(_) => Self::new(api_key),
        }
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let url = format!("{}/messages", self.base_url);
        log::debug!("POST {} (model {})", url, request.model);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(EngineError::AuthError);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EngineError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::service(status.as_u16(), truncate_body(&body)));
        }

        let api: ApiResponse = response.json().await?;
        if let Some(usage) = &api.usage {
            log::debug!(
                "generation used {} input / {} output tokens",
                usage.input_tokens,
                usage.output_tokens
            );
        }

        let text = api
            .content
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if text.trim().is_empty() {
            return Err(EngineError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Offline generator that echoes the submitted code back unchanged.
///
/// Used by tests and dry runs. The last user message is expected to
/// carry the code inside a fenced block, matching the prompts built by
/// [`crate::prompt`].
pub struct StubGenerator;

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let code = request
            .messages
            .last()
            .map(|message| extract_source_block(&message.content))
            .unwrap_or_default();
        Ok(format!("```\n{code}\n```"))
    }
}

/// Generator backend selected through the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorMode {
    /// Call the Anthropic API
    Api,
    /// Echo input back without network access
    Stub,
}

impl GeneratorMode {
    /// Read the mode from `DOCWEAVE_GENERATOR_MODE`, defaulting to the API
    pub fn from_env() -> Result<Self> {
        match std::env::var(GENERATOR_MODE_ENV) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Ok(Self::Api),
        }
    }

    fn from_value(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "api" => Ok(Self::Api),
            "stub" => Ok(Self::Stub),
            other => Err(EngineError::config(format!(
                "unsupported {GENERATOR_MODE_ENV} value: {other}"
            ))),
        }
    }
}

/// Build the generator selected by the environment
pub fn generator_from_env() -> Result<Box<dyn TextGenerator>> {
    match GeneratorMode::from_env()? {
        GeneratorMode::Api => Ok(Box::new(AnthropicClient::from_env()?)),
        GeneratorMode::Stub => {
            log::info!("using stub generator, no API calls will be made");
            Ok(Box::new(StubGenerator))
        }
    }
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(MAX_ERROR_BODY).collect();
    format!("{head}...")
}
