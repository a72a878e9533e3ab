use std::fmt;

use serde_json::Value;
use thiserror::Error;

use super::validate::ValidationErrors;
use crate::agent::ProviderError;

/// Why a single attempt was rejected.
#[derive(Debug, Clone)]
pub enum AttemptFailure {
    /// The strategy could not shape the output into JSON.
    Unparseable(String),
    /// The top level was a sequence where an object was required.
    ListShape,
    Invalid(ValidationErrors),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Unparseable(message) => write!(f, "unparseable output: {message}"),
            AttemptFailure::ListShape => f.write_str("list returned instead of an object"),
            AttemptFailure::Invalid(errors) => write!(f, "validation failed: {errors}"),
        }
    }
}

/// One pass through the retry loop. Lives only as long as the call.
#[derive(Debug, Clone)]
pub struct Attempt {
    /// Zero-based.
    pub index: u32,
    pub raw_output: Value,
    pub failure: AttemptFailure,
}

/// Terminal failure of the retry loop.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("model returned a list instead of an object on all {attempts} attempts")]
    MalformedShape { attempts: u32 },

    #[error("no valid output after {attempts} attempts: {detail}")]
    Exhausted {
        attempts: u32,
        detail: String,
        history: Vec<Attempt>,
    },
}

impl GenerationError {
    pub(crate) fn from_history(history: Vec<Attempt>) -> Self {
        let attempts = history.len() as u32;
        if history
            .iter()
            .all(|a| matches!(a.failure, AttemptFailure::ListShape))
        {
            return GenerationError::MalformedShape { attempts };
        }

        let detail = history
            .iter()
            .map(|a| format!("attempt {}: {}", a.index + 1, a.failure))
            .collect::<Vec<_>>()
            .join(" | ");
        GenerationError::Exhausted {
            attempts,
            detail,
            history,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Transport or credential failure; surfaced on the attempt it happened.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
