//! JSON input loading

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::InputError;

/// Read a whole JSON document from `path`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let file = File::open(path).map_err(|e| InputError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| InputError::json(path, e))
}

/// Read a JSON array, dropping `null` entries.
///
/// Fetched metadata dumps contain `null` for ids the upstream API could not
/// resolve; those are not errors.
pub fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, InputError> {
    let raw: Vec<Option<T>> = read_json(path)?;
    let total = raw.len();
    let items: Vec<T> = raw.into_iter().flatten().collect();
    if items.len() < total {
        log::debug!(
            "{}: skipped {} null entries",
            path.display(),
            total - items.len()
        );
    }
    log::info!("Loaded {} elements from {}", items.len(), path.display());
    Ok(items)
}
