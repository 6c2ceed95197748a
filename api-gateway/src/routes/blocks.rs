use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::routes::as_error_response;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct ProposeResponse {
    pub chain_length: usize,
}

/// `POST /block/propose/{pubkey}`
///
/// Runs both proposal steps for `pubkey`: attestation batching, then mining
/// every one of the node's own completions that currently clears quorum.
pub async fn propose(
    State(state): State<SharedState>,
    Path(pubkey): Path<String>,
) -> Result<Json<ProposeResponse>, (StatusCode, String)> {
    let mut engine = state.engine.lock().await;
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);

    engine.propose(&pubkey, now).map_err(as_error_response)?;

    let node = engine.node(&pubkey).map_err(as_error_response)?;
    Ok(Json(ProposeResponse {
        chain_length: node.chain.len(),
    }))
}
