//! Reload Module
//!
//! WebSocket-based live reload for develop mode.
//!
//! ```text
//! pipeline --notify--> WsActor --broadcast--> Browser
//! ```
//!
//! # Modules
//!
//! - `message` - live reload message types (reload, css)
//! - `server` - WebSocket acceptor feeding clients to the WsActor

pub mod message;
pub mod server;

pub use message::ReloadMessage;

use tokio::sync::mpsc;

use crate::actor::messages::WsMsg;
use crate::core::AssetCategory;

/// Pipeline side of the reload channel.
///
/// Sending never blocks: a pipeline running on a blocking thread must not
/// wait on the hub. In `build` the sender is disabled and every signal is
/// a no-op.
#[derive(Clone, Default)]
pub struct ReloadSender {
    tx: Option<mpsc::Sender<WsMsg>>,
}

impl ReloadSender {
    pub fn new(tx: mpsc::Sender<WsMsg>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Signal that `category` wrote new output.
    pub fn notify(&self, category: AssetCategory) {
        let Some(tx) = &self.tx else {
            return;
        };
        let msg = WsMsg::Push(ReloadMessage::for_category(category));
        match tx.try_send(msg) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                crate::debug!("reload"; "queue full, dropping {} signal", category);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_noop() {
        ReloadSender::disabled().notify(AssetCategory::Markup);
    }

    #[test]
    fn test_notify_sends_category_message() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = ReloadSender::new(tx);
        sender.notify(AssetCategory::Styles);

        match rx.try_recv() {
            Ok(WsMsg::Push(msg)) => assert_eq!(msg, ReloadMessage::for_category(AssetCategory::Styles)),
            _ => panic!("expected a push message"),
        }
    }

    #[test]
    fn test_full_queue_does_not_block() {
        let (tx, _rx) = mpsc::channel(1);
        let sender = ReloadSender::new(tx);
        sender.notify(AssetCategory::Scripts);
        sender.notify(AssetCategory::Scripts);
    }
}
