use std::sync::Arc;

use sqlx::PgPool;

use crate::agent::{AgentManager, EmbeddingManager};
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// JSON-strategy agent shared by every extraction path.
    pub agent: Arc<AgentManager>,
    /// `None` when no embedding backend could be built; the match endpoint
    /// answers 503 in that case.
    pub embedder: Option<Arc<EmbeddingManager>>,
    pub config: Config,
}
