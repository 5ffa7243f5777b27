pub mod annotate;
pub mod decompose;
pub mod download;
pub mod enumerate;
pub mod merge;
pub mod properties;

use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use std::path::Path;

pub(crate) fn progress_handler(quiet: bool) -> CliProgressHandler {
    if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    }
}

/// Creates the parent directory of an output file.
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
