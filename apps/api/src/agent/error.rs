use thiserror::Error;

/// Transport or credential failure talking to a generation backend.
///
/// Never retried by the agent layer: a missing key or an unreachable backend
/// will not fix itself between attempts.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} API key is missing")]
    MissingCredential { provider: &'static str },

    #[error("Unknown provider '{0}'")]
    UnknownProvider(String),

    #[error("{provider} does not support {capability}")]
    Unsupported {
        provider: &'static str,
        capability: &'static str,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Provider returned empty content")]
    EmptyContent,

    #[error("Could not decode provider response: {0}")]
    Decode(String),
}

/// Shaping failure: the backend answered, but not in a usable form.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Output is not valid JSON after repair ({message}); raw output: {raw}")]
    Unparseable { message: String, raw: String },

    #[error("Unknown strategy '{0}'")]
    UnknownStrategy(String),
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Strategy(#[from] StrategyError),
}
