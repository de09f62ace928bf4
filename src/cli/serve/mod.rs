//! Development server: static files from the output directory, with the
//! live-reload client injected into HTML.

mod content;
mod lifecycle;
mod path;
mod response;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel;
use tiny_http::{Request, Server};

use crate::actor::Coordinator;
use crate::config::ProjectConfig;
use crate::embed::serve::LIVERELOAD_URL;
use crate::{debug, log};

/// Request worker threads.
const REQUEST_THREADS: usize = 4;

/// What a request handler needs to know.
struct ServeState {
    root: PathBuf,
    ws_port: u16,
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    state: Arc<ServeState>,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server without starting the request loop.
///
/// `ws_port` is the port the live-reload listener actually bound.
pub fn bind_server(config: &ProjectConfig, ws_port: u16) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", addr);
    debug!("reload"; "ws://{}:{}", addr.ip(), ws_port);

    Ok(BoundServer {
        server,
        state: Arc::new(ServeState {
            root: config.dist_dir().to_path_buf(),
            ws_port,
        }),
        shutdown_rx,
    })
}

impl BoundServer {
    /// Start the actors, then serve requests until Ctrl+C (blocking).
    pub fn run(self, coordinator: Coordinator) -> Result<()> {
        let actor_handle = lifecycle::spawn_actors(coordinator.with_shutdown_signal(self.shutdown_rx));
        let result = run_request_loop(&self.server, &self.state);
        lifecycle::wait_for_shutdown(actor_handle);
        result
    }
}

fn run_request_loop(server: &Server, state: &Arc<ServeState>) -> Result<()> {
    // Slow image reads must not hold up the page itself
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let state = Arc::clone(state);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &state) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, state: &ServeState) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    if path::url_path(request.url()) == LIVERELOAD_URL {
        return response::respond_livereload_js(request, state.ws_port);
    }

    match path::resolve_path(request.url(), &state.root) {
        Some(file) => response::respond_file(request, &file),
        None => response::respond_not_found(request, &state.root),
    }
}
