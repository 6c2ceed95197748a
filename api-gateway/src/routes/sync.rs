use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::routes::as_error_response;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub pubkey1: String,
    pub pubkey2: String,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub status: &'static str,
}

/// `POST /sync`
pub async fn sync(
    State(state): State<SharedState>,
    Json(body): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, (StatusCode, String)> {
    let mut engine = state.engine.lock().await;
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);

    engine
        .sync(&body.pubkey1, &body.pubkey2, now)
        .map_err(as_error_response)?;
    Ok(Json(SyncResponse { status: "synced" }))
}
