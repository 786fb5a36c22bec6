//! JSON checkpoint files for the office list.
//!
//! Two checkpoints exist per run: one written immediately after the scrape
//! (so a failed enrichment or mail step does not lose half an hour of
//! browser driving) and one written after enrichment and sorting. Both use
//! the fixed [`OfficeRecord`] schema, and the `--parse` input mode reads
//! either file back.

use std::path::Path;

use crate::office::OfficeRecord;
use crate::StoreError;

/// Default checkpoint written right after scraping, before enrichment.
pub const PRE_ENRICHMENT_FILE: &str = "most_recent_pre.json";

/// Default checkpoint written after enrichment and sorting.
pub const FINAL_FILE: &str = "most_recent.json";

/// Serializes the office list as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be written. Serialization
/// of the fixed schema itself cannot fail for valid records; a failure is
/// surfaced as [`StoreError::Json`] all the same.
pub fn save_offices(path: &Path, offices: &[OfficeRecord]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(offices).map_err(|e| StoreError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    std::fs::write(path, json).map_err(|e| StoreError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Loads an office list previously written by [`save_offices`].
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read, or
/// [`StoreError::Json`] if its contents do not match the office schema.
pub fn load_offices(path: &Path) -> Result<Vec<OfficeRecord>, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| StoreError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| StoreError::Json {
        path: path.display().to_string(),
        source: e,
    })
}
