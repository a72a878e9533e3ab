//! JSON shaping: strict parse first, then one repair pass, then give up.
//!
//! Repairs are limited to what models routinely get wrong even when told not
//! to: markdown code fences, chatty prose around the payload, and raw control
//! characters inside string literals.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::Strategy;
use crate::agent::error::{AgentError, StrategyError};
use crate::agent::providers::{GenerationRequest, Provider};

pub struct JsonStrategy;

#[async_trait]
impl Strategy for JsonStrategy {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn apply(
        &self,
        request: &GenerationRequest,
        provider: &dyn Provider,
    ) -> Result<Value, AgentError> {
        let raw = provider.generate(request).await?;
        Ok(parse_json(&raw)?)
    }
}

/// Parses model output as JSON, applying the repair heuristics once if the
/// strict parse fails. The error carries the untouched raw text.
pub fn parse_json(raw: &str) -> Result<Value, StrategyError> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Ok(value);
    }

    debug!("Strict JSON parse failed; retrying on repaired output");
    let text = strip_json_fences(raw);
    let err = match serde_json::from_str(&escape_control_chars(text)) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };
    extract_json(text).ok_or_else(|| StrategyError::Unparseable {
        message: err.to_string(),
        raw: raw.to_string(),
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```JSON"))
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    stripped
        .trim_start()
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped.trim_start())
}

/// Finds the JSON value embedded in surrounding prose. Every `{` or `[` is a
/// candidate; the longest balanced span that parses wins, so bracketed prose
/// such as `[v1]` or `[1]` never shadows the payload.
fn extract_json(text: &str) -> Option<Value> {
    let mut best: Option<(usize, Value)> = None;
    let mut pos = 0;

    while let Some(offset) = text[pos..].find(['{', '[']) {
        let start = pos + offset;
        pos = start + 1;
        let Some(end) = balanced_end(text, start) else {
            continue;
        };
        let span = &text[start..=end];
        let Ok(value) = serde_json::from_str::<Value>(&escape_control_chars(span)) else {
            continue;
        };
        if best.as_ref().map_or(true, |(len, _)| span.len() > *len) {
            best = Some((span.len(), value));
        }
        // Nested candidates are always shorter than their parent.
        pos = end + 1;
    }
    best.map(|(_, value)| value)
}

/// Byte index of the bracket closing the one at `start`, skipping over
/// string literals.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Escapes raw control characters that appear inside JSON string literals.
fn escape_control_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() && (c as u32) < 0x20 => {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => out.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
        }
    }
    out
}
