use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::actor::fs::{FsActor, WorkerInboxes};
use crate::actor::messages::{WorkerMsg, WsMsg};
use crate::actor::worker::CategoryWorker;
use crate::actor::ws::WsActor;
use crate::core::is_shutdown;
use crate::pipeline::PipelineContext;
use crate::sequence::{DEVELOP_SEQUENCE, run_sequence};

const SHUTDOWN_POLL: Duration = Duration::from_millis(100);
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Run all actors concurrently.
///
/// The watcher and the hub start first. Workers start only once the
/// initial sequence is done; changes seen meanwhile wait in their inboxes.
pub(super) async fn run_actors(
    ctx: Arc<PipelineContext>,
    fs: FsActor,
    workers: Vec<CategoryWorker>,
    ws: WsActor,
    inboxes: WorkerInboxes,
    ws_tx: mpsc::Sender<WsMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let ws_handle = tokio::spawn(ws.run());
    let fs_handle = tokio::spawn(fs.run());

    let initial = {
        let ctx = Arc::clone(&ctx);
        tokio::task::spawn_blocking(move || run_sequence(&DEVELOP_SEQUENCE, &ctx))
    };
    match initial.await {
        Ok(Ok(summary)) if !summary.is_success() => {
            crate::log!("develop"; "initial build had failures, fix them and save to retry");
        }
        Ok(Ok(_)) => {}
        Ok(Err(e)) => crate::log!("develop"; "{e}"),
        Err(e) => crate::log!("develop"; "initial build panicked: {e}"),
    }

    let worker_handles: Vec<JoinHandle<()>> = workers
        .into_iter()
        .map(|worker| tokio::spawn(worker.run()))
        .collect();
    if !is_shutdown() {
        crate::log!("watch"; "watching {}", ctx.config.root_relative(ctx.config.src_dir()).display());
    }

    wait_for_signal(shutdown_rx, &fs_handle).await;

    crate::debug!("actor"; "sending shutdown to workers");
    for tx in inboxes.values() {
        let _ = tx.try_send(WorkerMsg::Shutdown);
    }
    drop(inboxes);
    fs_handle.abort();

    let _ = ws_tx.send(WsMsg::Shutdown).await;
    let _ = tokio::time::timeout(SHUTDOWN_GRACE, ws_handle).await;
    for handle in worker_handles {
        let _ = tokio::time::timeout(SHUTDOWN_GRACE, handle).await;
    }
}

/// Block until Ctrl+C, or until the watcher exits on its own.
async fn wait_for_signal(shutdown_rx: Option<Receiver<()>>, fs_handle: &JoinHandle<()>) {
    loop {
        if let Some(rx) = &shutdown_rx
            && rx.try_recv().is_ok()
        {
            crate::debug!("actor"; "shutdown signal received");
            return;
        }
        if is_shutdown() || fs_handle.is_finished() {
            return;
        }
        tokio::time::sleep(SHUTDOWN_POLL).await;
    }
}
