use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::routes::as_error_response;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ApRevealRequest {
    /// Accepted for symmetry with the curriculum's source document; the
    /// engine picks the hosting node itself rather than trusting the
    /// caller's choice of teacher.
    #[serde(default)]
    pub teacher_pubkey: Option<String>,
    pub qid: String,
    pub ans: String,
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
pub struct ApRevealResponse {
    pub status: &'static str,
    pub txn_id: String,
}

/// `POST /ap_reveal`
pub async fn ap_reveal(
    State(state): State<SharedState>,
    Json(body): Json<ApRevealRequest>,
) -> Result<(StatusCode, Json<ApRevealResponse>), (StatusCode, String)> {
    let mut engine = state.engine.lock().await;
    let txn = engine
        .submit_ap_reveal(&body.qid, &body.ans, body.timestamp)
        .map_err(as_error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApRevealResponse {
            status: "created",
            txn_id: txn.id,
        }),
    ))
}
