//! WebSocket Actor - Live Reload Hub
//!
//! This actor is responsible for:
//! - Managing WebSocket client connections
//! - Broadcasting reload messages to all connected clients
//!
//! # Architecture
//!
//! ```text
//! pipelines --[Push]--> WsActor --[broadcast]--> Clients
//! acceptor --[AddClient]--^
//! ```

mod client_io;

use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::messages::WsMsg;

/// WebSocket Actor - manages client connections and broadcasts
pub struct WsActor {
    /// Channel to receive messages
    rx: mpsc::Receiver<WsMsg>,
    /// Connected clients (shared with the reader thread)
    clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
}

impl WsActor {
    pub fn new(rx: mpsc::Receiver<WsMsg>) -> Self {
        Self {
            rx,
            clients: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        let clients_for_reader = Arc::clone(&self.clients);
        std::thread::spawn(move || {
            Self::client_reader_loop(clients_for_reader);
        });

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Push(message) => {
                    crate::debug!("reload"; "push {}", message.to_json());
                    self.broadcast(Message::Text(message.to_json().into()));
                }
                WsMsg::AddClient(stream) => self.add_client(stream),
                WsMsg::Shutdown => break,
            }
        }

        crate::debug!("reload"; "closing clients");
        let mut clients = self.clients.lock();
        for mut ws in clients.drain(..) {
            let _ = ws.close(None);
            let _ = ws.flush();
        }
    }

    /// Broadcast a message to all connected clients
    fn broadcast(&self, msg: Message) {
        let mut clients = self.clients.lock();
        if clients.is_empty() {
            crate::debug!("reload"; "no clients connected");
            return;
        }

        let count = clients.len();
        clients.retain_mut(|ws| match ws.send(msg.clone()) {
            Ok(()) => true,
            Err(e) => {
                crate::debug!("reload"; "client disconnected: {}", e);
                false
            }
        });
        crate::debug!("reload"; "broadcast to {} clients", count);
    }
}
