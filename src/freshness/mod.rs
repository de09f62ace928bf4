//! Freshness detection for incremental pipeline runs.

mod mtime;

pub use mtime::needs_update;
