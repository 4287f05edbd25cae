//! Liveness endpoints.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use safespace_core::constants::VERSION;

use crate::state::AppState;

pub async fn welcome() -> Json<serde_json::Value> {
    Json(json!({
        "message": "SafeSpace report intake and detection API",
        "version": VERSION,
        "docs": "/api/v1",
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": VERSION,
        "model_loaded": state.classifier.model_loaded(),
        "encryption": if state.cipher.is_ephemeral() { "ephemeral" } else { "configured" },
    }))
}
