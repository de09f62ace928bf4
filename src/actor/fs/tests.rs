use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tempfile::TempDir;
use tokio::sync::mpsc;

use super::debouncer::{DEBOUNCE_MS, Debouncer, IDLE_POLL_MS, is_temp_file};
use super::dispatch_changes;
use super::router::Router;
use super::types::{ChangeBatch, ChangeKind};
use super::watch_roots::WatchRoots;
use super::WorkerInboxes;
use crate::actor::messages::WorkerMsg;
use crate::core::{AssetCategory, CategoryGlobs};
use crate::utils::path::normalize_path;

/// A canonical source root with the usual layout.
fn make_src() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let src = normalize_path(temp.path()).join("src");
    for dir in ["scss", "js", "images", "fonts", "libs/css", "libs/js"] {
        std::fs::create_dir_all(src.join(dir)).unwrap();
    }
    (temp, src)
}

fn make_event(paths: &[&Path], kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.iter().map(|p| p.to_path_buf()).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Data(
        notify::event::DataChange::Any,
    ))
}

fn metadata_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
        notify::event::MetadataKind::WriteTime,
    ))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn remove_kind() -> notify::EventKind {
    notify::EventKind::Remove(notify::event::RemoveKind::File)
}

/// Debouncer whose burst is already past the quiet window.
fn settled(debouncer: &mut Debouncer) {
    debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS + 50));
}

fn inboxes(capacity: usize) -> (WorkerInboxes, FxHashMap<AssetCategory, mpsc::Receiver<WorkerMsg>>) {
    let mut txs = WorkerInboxes::default();
    let mut rxs = FxHashMap::default();
    for category in AssetCategory::ALL {
        let (tx, rx) = mpsc::channel(capacity);
        txs.insert(category, tx);
        rxs.insert(category, rx);
    }
    (txs, rxs)
}

// =============================================================================
// Debouncer
// =============================================================================

#[test]
fn test_debouncer_empty() {
    let mut debouncer = Debouncer::new();
    assert!(!debouncer.is_ready());
    assert!(debouncer.take_if_ready().is_none());
}

#[test]
fn test_event_kinds_recorded() {
    let (_tmp, src) = make_src();
    let a = src.join("js/a.js");
    let b = src.join("js/b.js");
    let c = src.join("js/c.js");
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(&[&a], create_kind()));
    debouncer.add_event(&make_event(&[&b], modify_kind()));
    debouncer.add_event(&make_event(&[&c], remove_kind()));

    assert_eq!(debouncer.changes.len(), 3);
    assert_eq!(debouncer.changes[&a], ChangeKind::Created);
    assert_eq!(debouncer.changes[&b], ChangeKind::Modified);
    assert_eq!(debouncer.changes[&c], ChangeKind::Removed);
}

#[test]
fn test_metadata_changes_ignored() {
    let (_tmp, src) = make_src();
    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(&[&src.join("js/a.js")], metadata_kind()));
    assert!(debouncer.changes.is_empty());
    assert!(debouncer.last_event.is_none());
}

#[test]
fn test_temp_files_ignored() {
    let (_tmp, src) = make_src();
    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(&[&src.join("scss/.main.scss.swp")], modify_kind()));
    debouncer.add_event(&make_event(&[&src.join("scss/main.scss~")], modify_kind()));
    assert!(debouncer.changes.is_empty());

    assert!(is_temp_file(Path::new("a.tmp")));
    assert!(is_temp_file(Path::new("4913")));
    assert!(!is_temp_file(Path::new("main.scss")));
}

#[test]
fn test_dedup_same_path() {
    let (_tmp, src) = make_src();
    let a = src.join("js/a.js");
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(&[&a, &a], modify_kind()));
    debouncer.add_event(&make_event(&[&a], create_kind()));
    assert_eq!(debouncer.changes.len(), 1);
    assert_eq!(debouncer.changes[&a], ChangeKind::Modified);
}

#[test]
fn test_remove_then_create_restores() {
    let (_tmp, src) = make_src();
    let a = src.join("js/a.js");
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(&[&a], remove_kind()));
    debouncer.add_event(&make_event(&[&a], create_kind()));
    assert_eq!(debouncer.changes[&a], ChangeKind::Created);
}

#[test]
fn test_create_then_remove_discards() {
    let (_tmp, src) = make_src();
    let a = src.join("js/a.js");
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(&[&a], create_kind()));
    debouncer.add_event(&make_event(&[&a], remove_kind()));
    assert!(debouncer.changes.is_empty());
}

#[test]
fn test_modify_then_remove_upgrades() {
    let (_tmp, src) = make_src();
    let a = src.join("js/a.js");
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(&[&a], modify_kind()));
    debouncer.add_event(&make_event(&[&a], remove_kind()));
    assert_eq!(debouncer.changes[&a], ChangeKind::Removed);
}

#[test]
fn test_not_ready_within_quiet_window() {
    let (_tmp, src) = make_src();
    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(&[&src.join("js/a.js")], modify_kind()));
    assert!(!debouncer.is_ready());

    settled(&mut debouncer);
    let events = debouncer.take_if_ready().unwrap();
    assert_eq!(events.0.len(), 1);
    assert!(debouncer.changes.is_empty());
    assert!(debouncer.last_event.is_none());
}

#[test]
fn test_taken_events_sorted() {
    let (_tmp, src) = make_src();
    let mut debouncer = Debouncer::new();
    let b = src.join("js/b.js");
    let a = src.join("js/a.js");
    debouncer.add_event(&make_event(&[&b, &a], modify_kind()));
    settled(&mut debouncer);

    let events = debouncer.take_if_ready().unwrap();
    let paths: Vec<_> = events.paths().cloned().collect();
    assert_eq!(paths, vec![a, b]);
}

#[test]
fn test_sleep_duration_idle_polls() {
    let debouncer = Debouncer::new();
    assert_eq!(debouncer.sleep_duration(), Duration::from_millis(IDLE_POLL_MS));
}

#[test]
fn test_sleep_duration_after_event() {
    let mut debouncer = Debouncer::new();
    debouncer.last_event = Some(Instant::now());

    let dur = debouncer.sleep_duration();
    assert!(dur >= Duration::from_millis(DEBOUNCE_MS - 20));
    assert!(dur <= Duration::from_millis(DEBOUNCE_MS));
}

#[test]
fn test_batch_summary() {
    let batch = ChangeBatch(vec![
        (PathBuf::from("src/js/a.js"), ChangeKind::Created),
        (PathBuf::from("src/js/b.js"), ChangeKind::Modified),
        (PathBuf::from("src/js/c.js"), ChangeKind::Modified),
    ]);
    assert_eq!(batch.summary(), "3 changes (1 created, 2 modified)");

    let single = ChangeBatch(vec![(PathBuf::from("src/index.html"), ChangeKind::Removed)]);
    assert_eq!(single.summary(), "1 change (1 removed)");
}

// =============================================================================
// Watch roots
// =============================================================================

#[test]
fn test_missing_root_attached_once_it_appears() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("src");
    let mut watcher = notify::recommended_watcher(|_: notify::Result<notify::Event>| {}).unwrap();

    let mut roots = WatchRoots::new(vec![root.clone()]);
    roots.attach_existing(&mut watcher).unwrap();
    assert!(!roots.is_watching(&root));

    std::fs::create_dir_all(&root).unwrap();
    roots.maintain(&mut watcher);
    assert!(roots.is_watching(&root));

    std::fs::remove_dir_all(&root).unwrap();
    roots.maintain(&mut watcher);
    assert!(!roots.is_watching(&root));
}

// =============================================================================
// Router
// =============================================================================

#[test]
fn test_styles_change_routes_only_to_styles() {
    let (_tmp, src) = make_src();
    let router = Router::new(&src, CategoryGlobs::new());
    let partial = src.join("scss/base/_vars.scss");

    let events = ChangeBatch(vec![(partial.clone(), ChangeKind::Modified)]);
    let routed = router.route(&events);

    assert_eq!(routed.len(), 1);
    assert_eq!(routed[&AssetCategory::Styles], vec![partial]);
}

#[test]
fn test_route_groups_by_category() {
    let (_tmp, src) = make_src();
    let router = Router::new(&src, CategoryGlobs::new());

    let events = ChangeBatch(vec![
        (src.join("about/index.html"), ChangeKind::Created),
        (src.join("js/app.js"), ChangeKind::Modified),
        (src.join("js/menu.js"), ChangeKind::Modified),
        (src.join("libs/js/jquery.js"), ChangeKind::Modified),
        (src.join("README.md"), ChangeKind::Modified),
    ]);
    let routed = router.route(&events);

    assert_eq!(
        routed.keys().copied().collect::<Vec<_>>(),
        vec![AssetCategory::Markup, AssetCategory::Scripts, AssetCategory::JsLibs]
    );
    assert_eq!(routed[&AssetCategory::Scripts].len(), 2);
}

#[test]
fn test_route_ignores_paths_outside_src() {
    let (tmp, src) = make_src();
    let router = Router::new(&src, CategoryGlobs::new());
    let dist = normalize_path(tmp.path()).join("dist/index.html");

    let events = ChangeBatch(vec![(dist, ChangeKind::Modified)]);
    assert!(router.route(&events).is_empty());
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn test_dispatch_styles_change_reaches_only_styles_worker() {
    let (_tmp, src) = make_src();
    let router = Router::new(&src, CategoryGlobs::new());
    let (txs, mut rxs) = inboxes(4);

    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(&[&src.join("scss/main.scss")], modify_kind()));
    settled(&mut debouncer);

    dispatch_changes(&mut debouncer, &router, &txs).unwrap();

    for (category, rx) in rxs.iter_mut() {
        let got = rx.try_recv();
        if *category == AssetCategory::Styles {
            assert!(matches!(got, Ok(WorkerMsg::Changed(ref p)) if p.len() == 1));
        } else {
            assert!(got.is_err(), "{category} should not be triggered");
        }
    }
}

#[test]
fn test_dispatch_coalesces_when_worker_busy() {
    let (_tmp, src) = make_src();
    let router = Router::new(&src, CategoryGlobs::new());
    let (txs, mut rxs) = inboxes(1);
    let file = src.join("js/app.js");

    for _ in 0..3 {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(&[&file], modify_kind()));
        settled(&mut debouncer);
        dispatch_changes(&mut debouncer, &router, &txs).unwrap();
    }

    let rx = rxs.get_mut(&AssetCategory::Scripts).unwrap();
    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_dispatch_stops_when_workers_gone() {
    let (_tmp, src) = make_src();
    let router = Router::new(&src, CategoryGlobs::new());
    let (txs, rxs) = inboxes(1);
    drop(rxs);

    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(&[&src.join("js/app.js")], modify_kind()));
    settled(&mut debouncer);
    assert!(dispatch_changes(&mut debouncer, &router, &txs).is_err());
}
