//! Actor Coordinator - Wires up the Watch Mode Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates one inbox per category
//! - Starts the watcher before the initial sequence
//! - Runs the initial `develop` sequence, then hands over to the workers

mod runtime;

use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;

use super::fs::{FsActor, Router, WorkerInboxes};
use super::messages::{WorkerMsg, WsMsg};
use super::worker::CategoryWorker;
use super::ws::WsActor;
use crate::config::ProjectConfig;
use crate::core::{AssetCategory, CategoryGlobs};
use crate::pipeline::PipelineContext;
use crate::reload::ReloadSender;

/// One queued follow-up run per category; further triggers coalesce.
const WORKER_INBOX: usize = 1;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    config: Arc<ProjectConfig>,
    ws_tx: mpsc::Sender<WsMsg>,
    ws_rx: mpsc::Receiver<WsMsg>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    /// `ws_tx`/`ws_rx` are the hub channel; the WebSocket listener already
    /// holds a clone of `ws_tx`.
    pub fn new(config: Arc<ProjectConfig>, ws_tx: mpsc::Sender<WsMsg>, ws_rx: mpsc::Receiver<WsMsg>) -> Self {
        Self {
            config,
            ws_tx,
            ws_rx,
            shutdown_rx: None,
        }
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    pub async fn run(self) -> Result<()> {
        let ctx = PipelineContext::new(Arc::clone(&self.config), ReloadSender::new(self.ws_tx.clone()))?;
        let ctx = Arc::new(ctx);

        let mut inboxes: WorkerInboxes = FxHashMap::default();
        let mut workers = Vec::with_capacity(AssetCategory::ALL.len());
        for category in AssetCategory::ALL {
            let (tx, rx) = mpsc::channel::<WorkerMsg>(WORKER_INBOX);
            inboxes.insert(category, tx);
            workers.push(CategoryWorker::new(category, rx, Arc::clone(&ctx)));
        }

        let src = self.config.src_dir().to_path_buf();
        let router = Router::new(&src, CategoryGlobs::new());
        let fs_actor =
            FsActor::new(vec![src], router, inboxes.clone()).context("failed to start file watcher")?;
        let ws_actor = WsActor::new(self.ws_rx);

        crate::debug!("actor"; "start");
        runtime::run_actors(
            ctx,
            fs_actor,
            workers,
            ws_actor,
            inboxes,
            self.ws_tx,
            self.shutdown_rx,
        )
        .await;

        crate::debug!("actor"; "stopped");
        Ok(())
    }
}
