use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(root))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/health/db", get(db_health))
}

/// GET /
/// Liveness probe
async fn root() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /health/db
/// Round-trips a trivial query through the pool. Unlike the rest of the
/// surface this reports the raw failure string: it exists for operators,
/// not clients.
async fn db_health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "sqlite",
                "connected": true,
            })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "database": "sqlite",
                "connected": false,
                "error": e.to_string(),
            })),
        ),
    }
}
