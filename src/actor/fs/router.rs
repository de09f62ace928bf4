use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::types::ChangeBatch;
use crate::core::{AssetCategory, CategoryGlobs};
use crate::utils::path::normalize_path;

/// Maps changed paths to the categories whose glob they match.
pub(crate) struct Router {
    /// Canonical source root (watcher paths are canonical too)
    src: PathBuf,
    globs: CategoryGlobs,
}

impl Router {
    pub(crate) fn new(src: &Path, globs: CategoryGlobs) -> Self {
        Self {
            src: normalize_path(src),
            globs,
        }
    }

    /// Group changed paths by category. Paths outside the source root or
    /// matching no glob are dropped.
    pub(super) fn route(&self, events: &ChangeBatch) -> BTreeMap<AssetCategory, Vec<PathBuf>> {
        let mut routed: BTreeMap<AssetCategory, Vec<PathBuf>> = BTreeMap::new();

        for path in events.paths() {
            let Ok(rel) = path.strip_prefix(&self.src) else {
                continue;
            };
            for category in self.globs.categories_for(rel) {
                routed.entry(category).or_default().push(path.clone());
            }
        }

        routed
    }
}
