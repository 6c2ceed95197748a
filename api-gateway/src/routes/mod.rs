//! HTTP route handlers, one module per resource.

pub mod ap_reveal;
pub mod blocks;
pub mod convergence;
pub mod health;
pub mod init;
pub mod nodes;
pub mod sync;
pub mod txns;

use axum::http::StatusCode;

use chain::EngineError;

/// Maps an [`EngineError`] to an HTTP status and a JSON error body.
pub(crate) fn engine_error_status(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::BadRequest(_) => StatusCode::BAD_REQUEST,
        EngineError::CurriculumUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub(crate) fn as_error_response(err: EngineError) -> (StatusCode, String) {
    (engine_error_status(&err), err.to_string())
}
