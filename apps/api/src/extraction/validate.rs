//! Stage two of the extraction pipeline: weakly-typed JSON → strongly-typed,
//! constraint-checked value.
//!
//! Serde enforces types, required fields and closed enum sets (case-sensitive
//! literal match). [`Validate::check`] adds the numeric and length bounds serde
//! cannot express.

use std::fmt;
use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Every constraint violation found in one candidate value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Rejects an empty or whitespace-only string.
    pub fn require_non_blank(&mut self, path: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(path, "must not be empty");
        }
    }

    pub fn require_min_items<T>(&mut self, path: &str, items: &[T], min: usize) {
        if items.len() < min {
            self.push(
                path,
                format!("must contain at least {min} item(s), found {}", items.len()),
            );
        }
    }

    pub fn require_at_least(&mut self, path: &str, value: i64, min: i64) {
        if value < min {
            self.push(path, format!("must be >= {min}, found {value}"));
        }
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// A target shape the LLM is asked to produce.
pub trait Validate: DeserializeOwned {
    /// Constraints beyond what deserialization enforces.
    fn check(&self, errors: &mut ValidationErrors);
}

/// A value proven to satisfy every constraint declared for `T`.
///
/// Only [`validate`] constructs one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Structured<T>(T);

impl<T> Deref for Structured<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

pub fn validate<T: Validate>(value: Value) -> Result<Structured<T>, ValidationErrors> {
    let candidate: T = serde_json::from_value(value).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.push("$", e.to_string());
        errors
    })?;

    let mut errors = ValidationErrors::new();
    candidate.check(&mut errors);
    errors.into_result().map(|_| Structured(candidate))
}
