use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "memory_backend": state.memory_backend,
        "llm_configured": state.llm_configured,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
