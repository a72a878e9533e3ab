// LLM access layer: Provider (transport) → Strategy (shaping) → AgentManager (façade).
// No other module talks to a generation backend directly.

pub mod error;
pub mod manager;
pub mod providers;
pub mod strategies;

#[cfg(test)]
pub mod testing;

pub use error::{AgentError, ProviderError, StrategyError};
pub use manager::{AgentManager, EmbeddingManager};
pub use providers::{GenerationOptions, GenerationRequest};
