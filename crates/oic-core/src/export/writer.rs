use std::fs;
use std::path::Path;

use super::ExportDocument;
use crate::error::ExportError;

/// Serialize `doc` and write it to `path`, creating parent directories.
///
/// The document is fully serialized before the file is touched, so a failed
/// run never leaves a truncated export behind.
pub fn write_document(path: &Path, doc: &ExportDocument) -> Result<(), ExportError> {
    let output = doc.to_json_pretty()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ExportError::Write {
            path: parent.display().to_string(),
            source,
        })?;
    }

    fs::write(path, output).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })?;

    log::debug!("wrote {} resources to {}", doc.resources.len(), path.display());
    Ok(())
}
