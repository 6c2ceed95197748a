//! Loads the shared question curriculum from a JSON file.

use std::fs;
use std::path::Path;

use crate::consensus::EngineError;
use crate::types::Question;

/// Reads and parses a curriculum JSON file: a top-level array of question
/// objects. Returns an empty curriculum (not an error) if the path does
/// not exist, so a node can start up before its curriculum file is
/// provisioned; a present-but-malformed file is an error.
pub fn load_curriculum(path: impl AsRef<Path>) -> Result<Vec<Question>, EngineError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(path = %path.display(), "curriculum file not found, starting empty");
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        EngineError::CurriculumUnavailable(format!("reading {}: {e}", path.display()))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        EngineError::CurriculumUnavailable(format!("parsing {}: {e}", path.display()))
    })
}
