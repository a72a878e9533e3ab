//! Schema-validated extraction: turn untrusted model output into a
//! [`Structured<T>`] or a typed failure.
//!
//! Two entry points share the same per-attempt pipeline
//! (shape → unwrap root → reject lists → validate):
//! - [`extract_once`]: single shot, degrades to `None`.
//! - [`ExtractionLoop::run_with`]: bounded retries with an identical prompt,
//!   first valid attempt wins.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::agent::{AgentError, AgentManager, GenerationOptions, ProviderError, StrategyError};

pub mod error;
pub mod schema;
pub mod template;
pub mod validate;

pub use error::{Attempt, AttemptFailure, ExtractionError, GenerationError};
pub use schema::SchemaDescriptor;
pub use validate::{validate, Structured, Validate, ValidationErrors};

const RAW_PREVIEW_CHARS: usize = 500;

/// Applies the per-attempt checks to an already-shaped value.
pub fn coerce<T: Validate>(
    descriptor: &SchemaDescriptor,
    value: Value,
) -> Result<Structured<T>, AttemptFailure> {
    match descriptor.unwrap_root(value) {
        Value::Array(_) => Err(AttemptFailure::ListShape),
        value => validate::<T>(value).map_err(AttemptFailure::Invalid),
    }
}

/// One generation, no retry. Anything short of a validated value yields
/// `Ok(None)` so the caller can log and carry on without structured data.
/// Provider failures are still returned as errors.
pub async fn extract_once<T: Validate>(
    agent: &AgentManager,
    descriptor: &SchemaDescriptor,
    prompt: &str,
) -> Result<Option<Structured<T>>, ProviderError> {
    let value = match agent.run(prompt, GenerationOptions::default()).await {
        Ok(value) => value,
        Err(AgentError::Provider(e)) => return Err(e),
        Err(AgentError::Strategy(e)) => {
            info!("{} extraction skipped: {e}", descriptor.name);
            return Ok(None);
        }
    };

    match coerce::<T>(descriptor, value) {
        Ok(structured) => Ok(Some(structured)),
        Err(failure) => {
            info!("{} extraction skipped: {failure}", descriptor.name);
            Ok(None)
        }
    }
}

/// Bounded validate-retry loop.
///
/// Every attempt resends the identical prompt; sampling variance is the only
/// source of a different outcome. Loop state is local to each `run` call.
pub struct ExtractionLoop<'a> {
    agent: &'a AgentManager,
    descriptor: &'a SchemaDescriptor,
    max_attempts: u32,
    options: GenerationOptions,
}

impl<'a> ExtractionLoop<'a> {
    pub fn new(agent: &'a AgentManager, descriptor: &'a SchemaDescriptor, max_attempts: u32) -> Self {
        Self {
            agent,
            descriptor,
            max_attempts: max_attempts.max(1),
            options: GenerationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs up to `max_attempts` generations. `accept` is a caller-side check
    /// applied after schema validation; a rejection counts as a failed attempt.
    pub async fn run_with<T, F>(&self, prompt: &str, accept: F) -> Result<Structured<T>, ExtractionError>
    where
        T: Validate,
        F: Fn(&T) -> Result<(), ValidationErrors>,
    {
        let mut history: Vec<Attempt> = Vec::with_capacity(self.max_attempts as usize);

        for index in 0..self.max_attempts {
            let (raw_output, outcome) = match self.agent.run(prompt, self.options).await {
                Ok(value) => {
                    debug!(
                        "{} attempt {} raw output: {}",
                        self.descriptor.name,
                        index + 1,
                        preview(&value)
                    );
                    let outcome = coerce::<T>(self.descriptor, value.clone()).and_then(|s| {
                        accept(&*s).map(|_| s).map_err(AttemptFailure::Invalid)
                    });
                    (value, outcome)
                }
                Err(AgentError::Provider(e)) => return Err(ExtractionError::Provider(e)),
                Err(AgentError::Strategy(e)) => {
                    let raw = match &e {
                        StrategyError::Unparseable { raw, .. } => raw.clone(),
                        other => other.to_string(),
                    };
                    (Value::String(raw), Err(AttemptFailure::Unparseable(e.to_string())))
                }
            };

            match outcome {
                Ok(structured) => {
                    info!(
                        "{} v{} validated on attempt {}/{}",
                        self.descriptor.name,
                        self.descriptor.version,
                        index + 1,
                        self.max_attempts
                    );
                    return Ok(structured);
                }
                Err(failure) => {
                    warn!(
                        "{} attempt {}/{} rejected: {failure}",
                        self.descriptor.name,
                        index + 1,
                        self.max_attempts
                    );
                    history.push(Attempt {
                        index,
                        raw_output,
                        failure,
                    });
                }
            }
        }

        Err(GenerationError::from_history(history).into())
    }
}

fn preview(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= RAW_PREVIEW_CHARS {
        return text;
    }
    let cut: String = text.chars().take(RAW_PREVIEW_CHARS).collect();
    format!("{cut}...")
}
