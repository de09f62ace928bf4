use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

/// Source directories the watcher should follow.
///
/// `src/` may be missing at startup or replaced wholesale by a checkout.
/// A missing root is picked up on the next idle tick after it appears.
pub(super) struct WatchRoots {
    wanted: Vec<PathBuf>,
    watching: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            wanted: roots,
            watching: FxHashSet::default(),
        }
    }

    /// Startup attach. A root that exists but cannot be watched is fatal.
    pub(super) fn attach_existing(&mut self, watcher: &mut RecommendedWatcher) -> notify::Result<()> {
        for root in &self.wanted {
            if root.exists() {
                watcher.watch(root, RecursiveMode::Recursive)?;
                self.watching.insert(root.clone());
            } else {
                crate::log!("watch"; "{} does not exist yet, waiting for it", root.display());
            }
        }
        Ok(())
    }

    /// Idle-tick upkeep: forget vanished roots, re-attach returned ones.
    pub(super) fn maintain(&mut self, watcher: &mut RecommendedWatcher) {
        let vanished: Vec<PathBuf> = self.watching.iter().filter(|r| !r.exists()).cloned().collect();
        for root in vanished {
            self.watching.remove(&root);
            crate::log!("watch"; "{} disappeared", root.display());
        }

        for root in &self.wanted {
            if self.watching.contains(root) || !root.exists() {
                continue;
            }
            if watcher.watch(root, RecursiveMode::Recursive).is_ok() {
                self.watching.insert(root.clone());
                crate::log!("watch"; "watching {}", root.display());
            }
        }
    }

    #[cfg(test)]
    pub(super) fn is_watching(&self, root: &Path) -> bool {
        self.watching.contains(root)
    }
}
