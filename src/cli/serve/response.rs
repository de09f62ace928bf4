//! HTTP response handlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use super::content::maybe_inject_livereload;
use crate::embed::serve::{LIVERELOAD_JS, LivereloadVars};
use crate::utils::mime::types::{HTML, JAVASCRIPT, PLAIN};

/// Respond with a static file, injecting the live-reload client into HTML.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = crate::utils::mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    let body = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let body = maybe_inject_livereload(body, content_type);
    send_body(request, 200, content_type, body)
}

/// Respond with 404, using the site's own `404.html` when it has one.
pub fn respond_not_found(request: Request, serve_root: &Path) -> Result<()> {
    let custom_404 = serve_root.join("404.html");
    let has_custom = custom_404.is_file();

    if is_head_request(&request) {
        return send_head(request, 404, if has_custom { HTML } else { PLAIN });
    }

    if has_custom
        && let Ok(body) = fs::read(&custom_404)
    {
        let body = maybe_inject_livereload(body, HTML);
        return send_body(request, 404, HTML, body);
    }

    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

/// Respond with the live-reload client from memory.
pub fn respond_livereload_js(request: Request, ws_port: u16) -> Result<()> {
    let body = LIVERELOAD_JS.render(&LivereloadVars { ws_port });
    send_body(request, 200, JAVASCRIPT, body.into_bytes())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response = Response::empty(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?)
        .with_header(make_header("Cache-Control", "no-store")?);
    request.respond(response)?;
    Ok(())
}

fn send_body(request: Request, status: u16, content_type: &'static str, body: Vec<u8>) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?)
        .with_header(make_header("Cache-Control", "no-store")?);
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header {key}: {value}"))
}
