use anyhow::{Context, Result};

/// Generation backend settings (`LLM_*`).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: String,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

/// Embedding backend settings (`EMBEDDING_*`).
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// True when `EMBEDDING_PROVIDER` was set explicitly; a build failure is
    /// then fatal instead of just disabling the match endpoint.
    pub explicit: bool,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub schedule_max_retries: u32,
    pub request_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let llm_provider = var("LLM_PROVIDER").unwrap_or_else(|| "openai".to_string());
        let llm_api_key = var("LLM_API_KEY").or_else(|| {
            match llm_provider.trim().to_ascii_lowercase().as_str() {
                "anthropic" | "claude" => var("ANTHROPIC_API_KEY"),
                _ => var("OPENAI_API_KEY"),
            }
        });

        let explicit_embedding = var("EMBEDDING_PROVIDER");
        let embedding_provider = explicit_embedding.clone().unwrap_or_else(|| {
            if llm_provider.eq_ignore_ascii_case("ollama") {
                "ollama".to_string()
            } else {
                "openai".to_string()
            }
        });
        // A key is only ever sent to the backend it was issued for.
        let embedding_api_key = var("EMBEDDING_API_KEY").or_else(|| {
            if embedding_provider.trim().eq_ignore_ascii_case(llm_provider.trim()) {
                llm_api_key.clone()
            } else if embedding_provider.trim().eq_ignore_ascii_case("openai") {
                var("OPENAI_API_KEY")
            } else {
                None
            }
        });

        let schedule_max_retries = parse_or(&var, "SCHEDULE_MAX_RETRIES", 3u32)?;
        if schedule_max_retries == 0 {
            anyhow::bail!("SCHEDULE_MAX_RETRIES must be at least 1");
        }

        Ok(Config {
            database_url: var("DATABASE_URL")
                .context("Required environment variable 'DATABASE_URL' is not set")?,
            database_max_connections: parse_or(&var, "DATABASE_MAX_CONNECTIONS", 10u32)?,
            llm: LlmConfig {
                provider: llm_provider,
                model: var("LLM_MODEL"),
                api_key: llm_api_key,
                base_url: var("LLM_BASE_URL"),
            },
            embedding: EmbeddingConfig {
                provider: embedding_provider,
                model: var("EMBEDDING_MODEL"),
                api_key: embedding_api_key,
                base_url: var("EMBEDDING_BASE_URL"),
                explicit: explicit_embedding.is_some(),
            },
            schedule_max_retries,
            request_timeout_secs: parse_or(&var, "REQUEST_TIMEOUT_SECS", 120u64)?,
            port: parse_or(&var, "PORT", 8080u16)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
