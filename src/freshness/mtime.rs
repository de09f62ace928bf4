//! Mtime-based freshness detection.
//!
//! A source needs processing when its output is missing or the source was
//! modified after the output was written. Equal timestamps count as fresh.

use std::path::Path;
use std::time::SystemTime;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Check if file A is newer than file B
///
/// Returns `false` if either file doesn't exist or times can't be compared
pub fn is_newer_than(a: &Path, b: &Path) -> bool {
    let (Some(a_time), Some(b_time)) = (get_mtime(a), get_mtime(b)) else {
        return false;
    };
    a_time > b_time
}

/// Check whether `output` must be regenerated from `source`.
pub fn needs_update(source: &Path, output: &Path) -> bool {
    !output.exists() || is_newer_than(source, output)
}
