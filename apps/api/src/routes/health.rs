use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the generation and embedding backends in use.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "llm": {
            "provider": state.agent.provider_name(),
            "strategy": state.agent.strategy_name(),
        },
        "embeddings": state.embedder.as_ref().map(|e| e.provider_name()),
    }))
}
