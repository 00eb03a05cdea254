//! Persisting the canonical document.

use crate::core::ScrapeError;
use crate::normalize::OutputDocument;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Pretty-printed JSON for `doc`. An empty document is `[]`.
pub fn to_json_pretty(doc: &OutputDocument) -> Result<String, ScrapeError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Write `doc` to `path`, creating missing directories.
///
/// The JSON goes to a temporary file next to `path` and is renamed over it, so
/// an existing file is either fully replaced or left untouched.
pub fn write_document(doc: &OutputDocument, path: &Path) -> Result<(), ScrapeError> {
    let json = to_json_pretty(doc)?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::info!(path = %path.display(), entries = doc.entry_count(), "wrote document");
    Ok(())
}
