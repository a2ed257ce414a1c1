use axum::{Extension, Json};
use serde_json::Value as JsonValue;

use crate::state::AppState;

/// GET /health
pub async fn health_check(Extension(state): Extension<AppState>) -> Json<JsonValue> {
    let puzzles = state.catalog().await.len();
    let sittings = state.open_sittings().await;
    Json(serde_json::json!({ "status": "ok", "puzzles": puzzles, "sittings": sittings }))
}
