//! Output directory removal for `build`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Clearing the output directory failed. Fatal for `build`.
#[derive(Debug, Error)]
#[error("failed to clean {}: {source}", path.display())]
pub struct CleanError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Remove the output directory and everything in it.
///
/// A missing directory is already clean. The directory is not recreated;
/// pipelines create what they write.
pub fn clean_output(dist: &Path) -> Result<(), CleanError> {
    match fs::remove_dir_all(dist) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CleanError {
            path: dist.to_path_buf(),
            source,
        }),
    }
}
