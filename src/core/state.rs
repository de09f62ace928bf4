//! Ctrl+C handling.
//!
//! `build` and the initial develop sequence exit at once with status 130.
//! Once the dev server is up, Ctrl+C instead raises the shutdown flag,
//! which the sequence runner, watcher and WebSocket loops poll, and
//! unblocks the server so `develop` can join its threads and return.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crossbeam::channel::Sender;
use tiny_http::Server;

/// Exit status for a process stopped by SIGINT.
const INTERRUPTED: i32 = 130;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Set once by `develop` after the dev server binds.
static HOOKS: OnceLock<ShutdownHooks> = OnceLock::new();

struct ShutdownHooks {
    server: Arc<Server>,
    actors: Sender<()>,
}

pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(on_interrupt)
        .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {e}"))
}

fn on_interrupt() {
    SHUTDOWN.store(true, Ordering::SeqCst);

    let Some(hooks) = HOOKS.get() else {
        std::process::exit(INTERRUPTED);
    };

    crate::log!("serve"; "shutting down...");
    let _ = hooks.actors.send(());
    hooks.server.unblock();
}

/// Switch Ctrl+C from "exit now" to a graceful stop of `server` and the
/// actor runtime listening on `actors`. Later calls are ignored.
pub fn register_server(server: Arc<Server>, actors: Sender<()>) {
    let _ = HOOKS.set(ShutdownHooks { server, actors });
}

pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
