//! Generation backends. Exactly one [`Provider`] (and optionally one
//! [`EmbeddingProvider`]) is built at startup from configuration; application
//! code only ever sees the trait objects.
//!
//! Providers never retry. Whether another attempt is worth making is decided
//! by the caller, which knows the target schema.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::agent::error::ProviderError;
use crate::config::{EmbeddingConfig, LlmConfig};

pub mod anthropic;
pub mod ollama;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use ollama::{OllamaEmbeddingProvider, OllamaProvider};
pub use openai::{OpenAiEmbeddingProvider, OpenAiProvider};

const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Per-call sampling knobs. Unset fields fall back to the provider's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl GenerationOptions {
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A prompt plus its sampling options. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    prompt: String,
    options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }
}

/// Text generation capability.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;
}

/// Embedding capability.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}

/// Backends selectable through `LLM_PROVIDER` / `EMBEDDING_PROVIDER`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Anthropic,
    Ollama,
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(ProviderError::UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
        };
        f.write_str(name)
    }
}

/// Builds the process-wide generation provider.
///
/// Fails fast on an unknown provider name or a missing credential; both are
/// startup errors, not something a retry can recover from.
pub fn build_provider(config: &LlmConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let kind: ProviderKind = config.provider.parse()?;
    let client = http_client()?;

    let provider: Arc<dyn Provider> = match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
            client,
            config.api_key.clone(),
            config.model.clone(),
            config.base_url.clone(),
        )?),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(
            client,
            config.api_key.clone(),
            config.model.clone(),
            config.base_url.clone(),
        )?),
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(
            client,
            config.model.clone(),
            config.base_url.clone(),
        )),
    };
    Ok(provider)
}

/// Builds the process-wide embedding provider.
pub fn build_embedding_provider(
    config: &EmbeddingConfig,
) -> Result<Arc<dyn EmbeddingProvider>, ProviderError> {
    let kind: ProviderKind = config.provider.parse()?;
    let client = http_client()?;

    let provider: Arc<dyn EmbeddingProvider> = match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiEmbeddingProvider::new(
            client,
            config.api_key.clone(),
            config.model.clone(),
            config.base_url.clone(),
        )?),
        ProviderKind::Ollama => Arc::new(OllamaEmbeddingProvider::new(
            client,
            config.model.clone(),
            config.base_url.clone(),
        )),
        ProviderKind::Anthropic => {
            return Err(ProviderError::Unsupported {
                provider: "anthropic",
                capability: "embeddings",
            })
        }
    };
    Ok(provider)
}

fn http_client() -> Result<Client, ProviderError> {
    Ok(Client::builder().timeout(HTTP_TIMEOUT).build()?)
}

/// Body shape shared by OpenAI and Anthropic error responses.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorBody {
    Structured { message: String },
    Plain(String),
}

/// Converts a non-success response into `ProviderError::Api`, pulling the
/// backend's own message out of the body when it has one.
pub(crate) async fn api_error(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ProviderError::Api {
        status,
        message: api_error_message(body),
    }
}

fn api_error_message(body: String) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(ApiErrorEnvelope {
            error: ApiErrorBody::Structured { message },
        })
        | Ok(ApiErrorEnvelope {
            error: ApiErrorBody::Plain(message),
        }) => message,
        Err(_) => body,
    }
}

/// Resolves `path` against an optional base URL override.
pub(crate) fn endpoint(base_url: Option<&str>, default_base: &str, path: &str) -> String {
    let base = base_url.unwrap_or(default_base).trim_end_matches('/');
    format!("{base}{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_defaults_to_openai() {
        assert_eq!(ProviderKind::default(), ProviderKind::OpenAi);
        assert_eq!("".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
    }

    #[test]
    fn test_provider_kind_parse_is_case_insensitive() {
        assert_eq!(" Ollama ".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);
        assert_eq!("ANTHROPIC".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
    }

    #[test]
    fn test_provider_kind_rejects_unknown_name() {
        let err = "bard".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, ProviderError::UnknownProvider(name) if name == "bard"));
    }

    #[test]
    fn test_build_provider_fails_without_openai_key() {
        let config = LlmConfig {
            provider: "openai".to_string(),
            model: None,
            api_key: None,
            base_url: None,
        };
        let err = build_provider(&config).err().unwrap();
        assert!(matches!(err, ProviderError::MissingCredential { provider: "openai" }));
    }

    #[test]
    fn test_build_provider_ollama_needs_no_key() {
        let config = LlmConfig {
            provider: "ollama".to_string(),
            model: None,
            api_key: None,
            base_url: None,
        };
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_anthropic_has_no_embeddings() {
        let config = EmbeddingConfig {
            provider: "anthropic".to_string(),
            model: None,
            api_key: Some("key".to_string()),
            base_url: None,
            explicit: true,
        };
        let err = build_embedding_provider(&config).err().unwrap();
        assert!(matches!(err, ProviderError::Unsupported { .. }));
    }

    #[test]
    fn test_api_error_message_prefers_structured_body() {
        let body = r#"{"error": {"message": "invalid x-api-key", "type": "auth"}}"#;
        assert_eq!(api_error_message(body.to_string()), "invalid x-api-key");
    }

    #[test]
    fn test_api_error_message_accepts_plain_error_string() {
        let body = r#"{"error": "model 'llama9' not found"}"#;
        assert_eq!(api_error_message(body.to_string()), "model 'llama9' not found");
    }

    #[test]
    fn test_api_error_message_falls_back_to_raw_body() {
        assert_eq!(api_error_message("Bad Gateway".to_string()), "Bad Gateway");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            endpoint(Some("http://localhost:11434/"), "unused", "/api/generate"),
            "http://localhost:11434/api/generate"
        );
        assert_eq!(
            endpoint(None, "https://api.openai.com/v1", "/embeddings"),
            "https://api.openai.com/v1/embeddings"
        );
    }

    #[test]
    fn test_generation_options_builder_keeps_other_knobs() {
        let options = GenerationOptions {
            temperature: Some(0.2),
            ..GenerationOptions::default()
        }
        .with_max_tokens(256);
        assert_eq!(options.temperature, Some(0.2));
        assert_eq!(options.top_p, None);
        assert_eq!(options.max_tokens, Some(256));
    }
}
