use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct InitResponse {
    pub status: &'static str,
    pub curriculum_length: usize,
}

/// `GET /init`
///
/// Introspection endpoint: reports the loaded curriculum length.
pub async fn init(State(state): State<SharedState>) -> (StatusCode, Json<InitResponse>) {
    let engine = state.engine.lock().await;
    (
        StatusCode::OK,
        Json(InitResponse {
            status: "ok",
            curriculum_length: engine.curriculum.len(),
        }),
    )
}
