use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::routes::as_error_response;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct ConvergenceResponse {
    pub convergence: f64,
}

/// `GET /convergence/{pubkey}/{qid}`
///
/// Always reports the weighted convergence score, matching the score the
/// engine itself uses to gate Proof-of-Knowledge mining.
pub async fn get_convergence(
    State(state): State<SharedState>,
    Path((pubkey, qid)): Path<(String, String)>,
) -> Result<Json<ConvergenceResponse>, (StatusCode, String)> {
    let engine = state.engine.lock().await;
    let score = engine
        .convergence(&pubkey, &qid, true)
        .map_err(as_error_response)?;
    Ok(Json(ConvergenceResponse { convergence: score }))
}
