use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::routes::as_error_response;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct AddNodeRequest {
    pub pubkey: String,
    pub archetype: String,
    #[serde(default)]
    pub provisional_reputation: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct AddNodeResponse {
    pub status: &'static str,
    pub pubkey: String,
}

/// `POST /node/add`
pub async fn add_node(
    State(state): State<SharedState>,
    Json(body): Json<AddNodeRequest>,
) -> (StatusCode, Json<AddNodeResponse>) {
    let mut engine = state.engine.lock().await;
    engine.add_node(&body.pubkey, &body.archetype, body.provisional_reputation);
    (
        StatusCode::CREATED,
        Json(AddNodeResponse {
            status: "created",
            pubkey: body.pubkey,
        }),
    )
}

#[derive(Debug, Serialize)]
pub struct NodeStateResponse {
    pub progress: usize,
    pub reputation: f64,
    pub chain_length: usize,
    pub mempool_size: usize,
}

/// `GET /state/{pubkey}`
pub async fn get_state(
    State(state): State<SharedState>,
    Path(pubkey): Path<String>,
) -> Result<Json<NodeStateResponse>, (StatusCode, String)> {
    let engine = state.engine.lock().await;
    let node = engine.node(&pubkey).map_err(as_error_response)?;
    Ok(Json(NodeStateResponse {
        progress: node.progress,
        reputation: node.reputation,
        chain_length: node.chain.len(),
        mempool_size: node.mempool.len(),
    }))
}
