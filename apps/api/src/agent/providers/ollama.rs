//! Local Ollama server adapter. No credential required.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{api_error, endpoint, EmbeddingProvider, GenerationRequest, Provider};
use crate::agent::error::ProviderError;

const OLLAMA_BASE: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "gemma3:4b";
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct OllamaProvider {
    client: Client,
    model: String,
    base_url: Option<String>,
}

impl OllamaProvider {
    pub fn new(client: Client, model: Option<String>, base_url: Option<String>) -> Self {
        Self {
            client,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url,
        }
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let options = request.options();
        let body = GenerateRequest {
            model: &self.model,
            prompt: request.prompt(),
            stream: false,
            options: GenerateOptions {
                temperature: options.temperature,
                top_p: options.top_p,
                num_predict: options.max_tokens,
            },
        };

        let response = self
            .client
            .post(endpoint(self.base_url.as_deref(), OLLAMA_BASE, "/api/generate"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        if parsed.response.trim().is_empty() {
            return Err(ProviderError::EmptyContent);
        }
        Ok(parsed.response)
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

pub struct OllamaEmbeddingProvider {
    client: Client,
    model: String,
    base_url: Option<String>,
}

impl OllamaEmbeddingProvider {
    pub fn new(client: Client, model: Option<String>, base_url: Option<String>) -> Self {
        Self {
            client,
            model: model.unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            base_url,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let response = self
            .client
            .post(endpoint(self.base_url.as_deref(), OLLAMA_BASE, "/api/embed"))
            .json(&EmbedRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        parsed
            .embeddings
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyContent)
    }
}
