//! FileSystem Actor
//!
//! Watches the source tree and forwards debounced changes to the
//! per-category workers. The watcher starts before the initial sequence
//! runs, so edits made during startup are not lost.
//!
//! Architecture:
//! ```text
//! Watcher → Debouncer (pure timing) → Router (glob match) → WorkerMsg per category
//! ```

use std::path::PathBuf;

use notify::RecommendedWatcher;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;

use super::messages::WorkerMsg;
use crate::core::AssetCategory;

// Pure timing and deduplication.
mod debouncer;
// Changed paths -> categories.
mod router;
// Shared fs event types.
mod types;
// Watch root attach/re-attach lifecycle.
mod watch_roots;

#[cfg(test)]
mod tests;

use debouncer::Debouncer;
pub(super) use router::Router;
use watch_roots::WatchRoots;

/// Worker inboxes, one per category
pub(super) type WorkerInboxes = FxHashMap<AssetCategory, mpsc::Sender<WorkerMsg>>;

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// Watch-root consistency layer (attach/re-attach root directories)
    watch_roots: WatchRoots,
    router: Router,
    workers: WorkerInboxes,
    /// Debouncer state
    debouncer: Debouncer,
}

impl FsActor {
    /// Create a new FsActor; watching starts immediately.
    pub(super) fn new(roots: Vec<PathBuf>, router: Router, workers: WorkerInboxes) -> notify::Result<Self> {
        // notify delivers on its own thread; bridge through a sync channel
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut watch_roots = WatchRoots::new(roots);
        watch_roots.attach_existing(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            router,
            workers,
            debouncer: Debouncer::new(),
        })
    }

    /// Run the actor event loop until every worker has shut down
    pub async fn run(self) {
        let Self {
            notify_rx,
            mut watcher,
            mut watch_roots,
            router,
            workers,
            mut debouncer,
        } = self;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => debouncer.add_event(&event),
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    watch_roots.maintain(&mut watcher);
                    if dispatch_changes(&mut debouncer, &router, &workers).is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Send debounced changes to the matching workers.
///
/// A full inbox means a run is already queued for that category, which
/// will pick up these changes too, so the trigger is dropped.
/// Returns `Err(())` once all workers are gone.
fn dispatch_changes(
    debouncer: &mut Debouncer,
    router: &Router,
    workers: &WorkerInboxes,
) -> Result<(), ()> {
    let Some(events) = debouncer.take_if_ready() else {
        return Ok(());
    };

    events.log();

    for (category, paths) in router.route(&events) {
        let Some(tx) = workers.get(&category) else {
            continue;
        };
        match tx.try_send(WorkerMsg::Changed(paths)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                crate::debug!("watch"; "{} already queued", category);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                crate::debug!("watch"; "{} worker stopped", category);
            }
        }
    }

    if workers.values().all(mpsc::Sender::is_closed) {
        return Err(());
    }
    Ok(())
}
