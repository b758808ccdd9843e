use std::fs;
use std::io;
use std::path::Path;

use error_common::{PracticeError, Result};
use serde::de::DeserializeOwned;

/// Read and deserialize a JSON file
///
/// # Errors
///
/// A missing file is [`PracticeError::NotFound`]. JSON that does not match
/// `T` is a validation error keyed by the file path.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => PracticeError::NotFound(format!("input file {}", path.display())),
        _ => PracticeError::Other(
            anyhow::Error::new(err).context(format!("Failed to read {}", path.display())),
        ),
    })?;
    serde_json::from_str(&raw)
        .map_err(|err| PracticeError::validation([(path.display().to_string(), err.to_string())]))
}
