//! Source discovery for a category (pure, no side effects).

use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use crate::core::{AssetCategory, CategoryGlobs};

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Collect every file under `src_root` matching the category glob.
///
/// Only the glob base is walked. A missing base directory yields an
/// empty list. Results are sorted so that runs are deterministic.
pub fn scan_category(src_root: &Path, category: AssetCategory, globs: &CategoryGlobs) -> Vec<PathBuf> {
    let base = src_root.join(category.glob_base());
    if !base.is_dir() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(&base)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.path())
        .filter(|path| {
            path.strip_prefix(src_root)
                .is_ok_and(|rel| globs.matches(category, rel))
        })
        .collect();

    files.sort();
    files
}
