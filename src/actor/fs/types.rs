use std::path::PathBuf;

/// Net effect of a burst of notify events on one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// One settled burst of source changes, sorted by path.
pub(super) struct ChangeBatch(pub(super) Vec<(PathBuf, ChangeKind)>);

impl ChangeBatch {
    pub(super) fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.0.iter().map(|(path, _)| path)
    }

    /// e.g. `3 changes (1 created, 2 modified)`
    pub(super) fn summary(&self) -> String {
        let count = |kind| self.0.iter().filter(|(_, k)| *k == kind).count();
        let parts: Vec<String> = [ChangeKind::Created, ChangeKind::Modified, ChangeKind::Removed]
            .into_iter()
            .map(|kind| (count(kind), kind.label()))
            .filter(|(n, _)| *n > 0)
            .map(|(n, label)| format!("{n} {label}"))
            .collect();

        let total = self.0.len();
        let noun = if total == 1 { "change" } else { "changes" };
        format!("{total} {noun} ({})", parts.join(", "))
    }

    /// Per-file lines, shown under `--verbose`.
    pub(super) fn log(&self) {
        crate::debug!("watch"; "{}", self.summary());
        for (path, kind) in &self.0 {
            crate::debug!("watch"; "{}: {}", kind.label(), path.display());
        }
    }
}
