use std::io::Write;
use std::path::Path;

use crate::error::{ImportError, Result};
use crate::model::import::ImportResult;

pub fn to_json(result: &ImportResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Write the document as pretty JSON to `path`, creating parent directories.
pub fn write_to_file(result: &ImportResult, path: &Path) -> Result<()> {
    let json = to_json(result)?;
    let write_err = |source: std::io::Error| ImportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, json).map_err(write_err)?;
    tracing::info!(path = %path.display(), "wrote import document");
    Ok(())
}

pub fn write_to(result: &ImportResult, mut out: impl Write) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    writeln!(out, "{json}")
}
