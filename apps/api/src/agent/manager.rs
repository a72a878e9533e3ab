use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::error::{AgentError, ProviderError, StrategyError};
use super::providers::{EmbeddingProvider, GenerationOptions, GenerationRequest, Provider};
use super::strategies::{build_strategy, Strategy, StrategyKind};

/// The single entry point services use to talk to an LLM.
///
/// Binds one provider to one strategy. Holds no retry logic: only the caller
/// knows the target schema and can judge whether a result is acceptable.
pub struct AgentManager {
    provider: Arc<dyn Provider>,
    strategy: Box<dyn Strategy>,
}

impl AgentManager {
    pub fn new(provider: Arc<dyn Provider>, strategy: Box<dyn Strategy>) -> Self {
        Self { provider, strategy }
    }

    /// Binds `provider` to the strategy registered under `strategy` (`json`, `text`).
    pub fn with_strategy_name(
        provider: Arc<dyn Provider>,
        strategy: &str,
    ) -> Result<Self, StrategyError> {
        let kind: StrategyKind = strategy.parse()?;
        Ok(Self::new(provider, build_strategy(kind)))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub async fn run(&self, prompt: &str, options: GenerationOptions) -> Result<Value, AgentError> {
        let request = GenerationRequest::new(prompt, options);
        debug!(
            provider = self.provider.name(),
            strategy = self.strategy.name(),
            prompt_chars = prompt.len(),
            "Running agent"
        );
        self.strategy.apply(&request, self.provider.as_ref()).await
    }
}

/// Façade over the embedding capability.
pub struct EmbeddingManager {
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingManager {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.provider.embed(text).await
    }
}
