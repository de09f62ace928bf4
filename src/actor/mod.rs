//! Actor System for Watch Mode
//!
//! Message-passing concurrency for `develop`:
//!
//! ```text
//!                  ┌──> CategoryWorker (markup)  ──┐
//! FsActor ─────────┼──> CategoryWorker (styles)  ──┼──> WsActor
//! (watch+route)    └──> CategoryWorker (...)     ──┘   (broadcast)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File system watcher with debouncing and glob routing
//! - `worker` - One pipeline runner per category
//! - `ws` - WebSocket broadcast
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod worker;
pub mod ws;

pub use coordinator::Coordinator;
