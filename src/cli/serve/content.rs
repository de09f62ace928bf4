//! Live-reload injection into served HTML.

use crate::embed::serve::script_tag;

/// Inject the live-reload client if the response is HTML.
pub fn maybe_inject_livereload(body: Vec<u8>, content_type: &str) -> Vec<u8> {
    if content_type.starts_with("text/html") {
        inject_livereload_script(&body)
    } else {
        body
    }
}

/// Insert the client tag before the last `</body>`, or append it.
fn inject_livereload_script(content: &[u8]) -> Vec<u8> {
    let tag = script_tag();
    let tag = tag.as_bytes();

    const PATTERN: &[u8] = b"</body>";
    let pos = content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
        .unwrap_or(content.len());

    let mut result = Vec::with_capacity(content.len() + tag.len());
    result.extend_from_slice(&content[..pos]);
    result.extend_from_slice(tag);
    result.extend_from_slice(&content[pos..]);
    result
}
