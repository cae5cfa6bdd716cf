//! Output file naming and cleanup

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::TargetBounds;
use crate::error::{ErrorContext, Result};

/// Path of the image a resizer writes in single-pass mode.
///
/// `{dir}/{basename}.{resizer}.{W}x{H}{ext}`, using the requested bounds
/// rather than the resolved ones. An empty `dir` puts the file next to
/// the source.
pub fn output_path(dir: &Path, source: &Path, resizer: &str, bounds: TargetBounds) -> PathBuf {
    let dir = if dir.as_os_str().is_empty() {
        source.parent().unwrap_or_else(|| Path::new("."))
    } else {
        dir
    };

    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    dir.join(format!(
        "{}.{}.{}x{}{}",
        stem,
        resizer,
        bounds.width(),
        bounds.height(),
        ext
    ))
}

/// Remove `dir` and everything below it, returning how many files went away.
///
/// A missing directory counts as already clean.
pub fn clean(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        debug!("Nothing to clean at {}", dir.display());
        return Ok(0);
    }

    let files = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count();

    std::fs::remove_dir_all(dir).with_path(dir)?;
    info!("Removed {} files from {}", files, dir.display());

    Ok(files)
}
