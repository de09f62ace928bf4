//! Actor Message Definitions
//!
//! ```text
//! FsActor --Changed--> CategoryWorker --(pipeline)--> WsActor
//! ```

use std::net::TcpStream;
use std::path::PathBuf;

use crate::reload::ReloadMessage;

// =============================================================================
// CategoryWorker Messages
// =============================================================================

/// Messages to a per-category worker
#[derive(Debug)]
pub enum WorkerMsg {
    /// Source files of this category changed
    Changed(Vec<PathBuf>),
    /// Shutdown
    Shutdown,
}

// =============================================================================
// WsActor Messages
// =============================================================================

/// Messages to WebSocket Actor
#[derive(Debug)]
pub enum WsMsg {
    /// Push a message to every connected client
    Push(ReloadMessage),
    /// Add client (handshake not yet performed)
    AddClient(TcpStream),
    /// Shutdown
    Shutdown,
}
