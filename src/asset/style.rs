//! Stylesheet compilation: Sass → one bundle → vendor prefixes.
//!
//! Each entry sheet is compiled on its own with `grass`, the results are
//! joined in path order, and the joined sheet goes through lightningcss
//! once so that prefixing and minification see the whole bundle.

use std::path::Path;

use lightningcss::targets::{Browsers, Targets};

use super::TransformError;
use super::minify::minify_css;

/// Partials (`_name.scss`) are only reachable through `@use`/`@import`.
pub fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'))
}

/// Compile one Sass entry sheet in compressed style.
///
/// Imports resolve against the sheet's own directory first, then the
/// styles root.
pub fn compile_sass(path: &Path, styles_root: &Path) -> Result<String, TransformError> {
    let mut options = grass::Options::default().style(grass::OutputStyle::Compressed);
    if let Some(dir) = path.parent() {
        options = options.load_path(dir);
    }
    options = options.load_path(styles_root);

    grass::from_path(path, &options).map_err(|e| TransformError::Sass(e.to_string()))
}

/// Resolve browserslist queries into lightningcss targets.
pub fn browser_targets(queries: &[String]) -> Result<Targets, TransformError> {
    let browsers =
        Browsers::from_browserslist(queries).map_err(|e| TransformError::Css(e.to_string()))?;
    Ok(Targets {
        browsers,
        ..Targets::default()
    })
}

/// Join compiled sheets and autoprefix the result.
pub fn bundle(sheets: &[String], bundle_name: &str, targets: Targets) -> Result<String, TransformError> {
    let joined = sheets.join("\n");
    minify_css(&joined, bundle_name, targets)
}
