mod agent;
mod config;
mod db;
mod errors;
mod extraction;
mod jobs;
mod models;
mod resumes;
mod routes;
mod schedule;
mod schemas;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agent::providers::{build_embedding_provider, build_provider};
use crate::agent::{AgentManager, EmbeddingManager};
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillPath API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.database_max_connections).await?;

    // Generation backend: exactly one provider per process, JSON strategy
    let provider = build_provider(&config.llm).context("Failed to initialize LLM provider")?;
    let agent = AgentManager::with_strategy_name(provider, "json")?;
    info!(
        "LLM agent initialized (provider: {}, strategy: {})",
        agent.provider_name(),
        agent.strategy_name()
    );

    // Embedding backend is optional unless explicitly requested
    let embedder = match build_embedding_provider(&config.embedding) {
        Ok(provider) => {
            let manager = EmbeddingManager::new(provider);
            info!("Embedding provider initialized ({})", manager.provider_name());
            Some(Arc::new(manager))
        }
        Err(e) if config.embedding.explicit => {
            return Err(e).context("Failed to initialize embedding provider");
        }
        Err(e) => {
            warn!("Embeddings disabled: {e}");
            None
        }
    };

    // Build app state
    let state = AppState {
        db,
        agent: Arc::new(agent),
        embedder,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once the frontend domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
