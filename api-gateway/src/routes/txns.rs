use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use chain::TransactionKind;

use crate::routes::as_error_response;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct CreateTxnRequest {
    pub qid: String,
    pub pubkey: String,
    pub ans: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default = "now")]
    pub timestamp: f64,
}

fn now() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[derive(Debug, Serialize)]
pub struct CreateTxnResponse {
    pub status: &'static str,
    pub txn_id: String,
}

/// `POST /txn/create`
pub async fn create_txn(
    State(state): State<SharedState>,
    Json(body): Json<CreateTxnRequest>,
) -> Result<(StatusCode, Json<CreateTxnResponse>), (StatusCode, String)> {
    let mut engine = state.engine.lock().await;
    let txn = engine
        .create_txn(&body.pubkey, &body.qid, &body.ans, body.timestamp, body.kind)
        .map_err(as_error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(CreateTxnResponse {
            status: "created",
            txn_id: txn.id,
        }),
    ))
}
