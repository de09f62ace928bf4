//! Utility modules.

pub mod mime;
pub mod path;
