//! Deterministic provider doubles for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::ProviderError;
use super::providers::{EmbeddingProvider, GenerationRequest, Provider};

/// Replays canned replies in order and counts invocations. Once the script
/// runs out, the optional repeating reply is returned forever.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    repeat: Option<String>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_results(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    pub fn from_results(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            repeat: None,
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn repeating(reply: impl Into<String>) -> Self {
        Self {
            repeat: Some(reply.into()),
            ..Self::from_results(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push(request.prompt().to_string());

        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(reply) => reply,
            None => self.repeat.clone().ok_or(ProviderError::EmptyContent),
        }
    }
}

/// Embeds text as a fixed-size bag of lowercase letter counts.
pub struct LetterCountEmbedder;

#[async_trait]
impl EmbeddingProvider for LetterCountEmbedder {
    fn name(&self) -> &'static str {
        "letter_count"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let mut counts = vec![0.0_f32; 26];
        for c in text.chars().filter(char::is_ascii_alphabetic) {
            counts[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
        }
        Ok(counts)
    }
}
