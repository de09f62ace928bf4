//! Core types - pure abstractions shared across the codebase.

mod category;
mod state;

pub use category::{AssetCategory, CategoryGlobs, Chain};
pub use state::{is_shutdown, register_server, setup_shutdown_handler};
