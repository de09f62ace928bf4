//! URL to filesystem path resolution.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Resolve a request URL to a file under `serve_root`.
///
/// Directories resolve to their `index.html`. Anything that would leave
/// the root (`..` segments, symlinks pointing outside) resolves to `None`.
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url)?;
    if clean.split('/').any(|segment| segment == "..") {
        return None;
    }

    // Canonicalize to resolve symlinks and verify the path stays under the root
    let canonical = serve_root.join(&clean).canonicalize().ok()?;
    let root = serve_root.canonicalize().ok()?;
    if !canonical.starts_with(&root) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    let index = canonical.join("index.html");
    index.is_file().then_some(index)
}

/// Path part of a request URL, without query or fragment.
pub fn url_path(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

/// Strip query, percent-decode, trim slashes. `None` for invalid UTF-8.
fn normalize_url(url: &str) -> Option<String> {
    let decoded = percent_decode_str(url_path(url)).decode_utf8().ok()?;
    Some(decoded.trim_matches('/').replace('\\', "/"))
}
