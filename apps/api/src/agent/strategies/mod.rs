//! Response shaping applied on top of a provider's raw text.

use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;

use crate::agent::error::{AgentError, StrategyError};
use crate::agent::providers::{GenerationRequest, Provider};

pub mod json;
pub mod plain;

pub use json::JsonStrategy;
pub use plain::PlainTextStrategy;

/// Invokes a provider and shapes what comes back.
///
/// Implementations may fail with `StrategyError` when the output cannot be
/// shaped; provider failures pass through untouched.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn apply(
        &self,
        request: &GenerationRequest,
        provider: &dyn Provider,
    ) -> Result<Value, AgentError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StrategyKind {
    #[default]
    Json,
    PlainText,
}

impl FromStr for StrategyKind {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StrategyKind::Json),
            "text" | "plain" | "plain_text" => Ok(StrategyKind::PlainText),
            other => Err(StrategyError::UnknownStrategy(other.to_string())),
        }
    }
}

pub fn build_strategy(kind: StrategyKind) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::Json => Box::new(JsonStrategy),
        StrategyKind::PlainText => Box::new(PlainTextStrategy),
    }
}
