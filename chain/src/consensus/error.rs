use std::fmt;

/// Errors the consensus engine can return to a caller.
///
/// Conditions that are merely "nothing happened" — no quorum, convergence
/// below threshold, no minable completions — are not represented here;
/// they are successful calls whose effect on chain length is zero. This
/// enum only covers cases where the caller asked for something the engine
/// cannot do at all.
#[derive(Debug)]
pub enum EngineError {
    /// Operation referenced a pubkey absent from the node registry.
    NotFound(String),
    /// Request carried a missing or ill-typed field.
    BadRequest(String),
    /// Curriculum failed to load; engine continues with an empty curriculum.
    CurriculumUnavailable(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NotFound(msg) => write!(f, "not found: {msg}"),
            EngineError::BadRequest(msg) => write!(f, "bad request: {msg}"),
            EngineError::CurriculumUnavailable(msg) => write!(f, "curriculum unavailable: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
