use async_trait::async_trait;
use serde_json::Value;

use super::Strategy;
use crate::agent::error::AgentError;
use crate::agent::providers::{GenerationRequest, Provider};

/// Returns the provider's text unchanged, as a JSON string value.
pub struct PlainTextStrategy;

#[async_trait]
impl Strategy for PlainTextStrategy {
    fn name(&self) -> &'static str {
        "plain_text"
    }

    async fn apply(
        &self,
        request: &GenerationRequest,
        provider: &dyn Provider,
    ) -> Result<Value, AgentError> {
        let text = provider.generate(request).await?;
        Ok(Value::String(text))
    }
}
