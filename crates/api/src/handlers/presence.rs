use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PingRequest {
    pub id: Option<String>,
}

/// `POST /presence/ping` — record a heartbeat for an opaque client id.
///
/// The id is client-chosen and unauthenticated; the counter is an ambient
/// signal, not an audit trail.
pub async fn ping(
    State(state): State<AppState>,
    Json(payload): Json<PingRequest>,
) -> AppResult<StatusCode> {
    let id = payload
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("User ID is required".into()))?;

    state.presence.heartbeat(id);
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /presence/count` — how many distinct ids pinged within the TTL.
pub async fn count(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "count": state.presence.count() }))
}
