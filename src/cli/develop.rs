//! `assetline` / `assetline develop`: initial pipelines, then watch and serve.
//!
//! Startup order:
//! 1. bind the live-reload WebSocket listener (its port goes into the client)
//! 2. bind the HTTP server and register it for Ctrl+C
//! 3. start the actors (watcher first, then the initial sequence, then workers)
//! 4. serve requests until Ctrl+C

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use super::serve;
use crate::actor::Coordinator;
use crate::actor::messages::WsMsg;
use crate::config::ProjectConfig;
use crate::reload::server::start_ws_server;

const WS_CHANNEL_BUFFER: usize = 32;

pub fn develop(config: Arc<ProjectConfig>) -> Result<()> {
    let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(WS_CHANNEL_BUFFER);
    let ws_port = start_ws_server(config.serve.interface, config.serve.ws_port, ws_tx.clone())?;
    if ws_port != config.serve.ws_port {
        crate::log!("reload"; "port {} in use, using {} instead", config.serve.ws_port, ws_port);
    }

    let server = serve::bind_server(&config, ws_port)?;
    let coordinator = Coordinator::new(config, ws_tx, ws_rx);
    server.run(coordinator)
}
