use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use crate::core::is_shutdown;
use crate::reload::ReloadMessage;

use super::WsActor;

impl WsActor {
    /// Perform the handshake and register the client
    pub(super) fn add_client(&self, stream: TcpStream) {
        // Blocking handshake, then non-blocking for the reader poll
        match tungstenite::accept(stream) {
            Ok(mut ws) => {
                let _ = ws.get_ref().set_nonblocking(true);

                let connected = ReloadMessage::connected();
                if let Err(e) = ws.send(Message::Text(connected.to_json().into())) {
                    crate::debug!("reload"; "failed to greet client: {}", e);
                    return;
                }

                let mut clients = self.clients.lock();
                clients.push(ws);
                crate::debug!("reload"; "client connected (total: {})", clients.len());
            }
            Err(e) => {
                crate::log!("reload"; "handshake failed: {}", e);
            }
        }
    }

    /// Background thread draining client frames.
    ///
    /// Clients never send anything meaningful, but reading is required to
    /// answer pings and notice closed connections.
    pub(super) fn client_reader_loop(clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>) {
        while !is_shutdown() {
            std::thread::sleep(Duration::from_millis(100));

            let mut clients = clients.lock();
            clients.retain_mut(|ws| match ws.read() {
                Ok(Message::Close(_)) => false,
                Ok(_) => true,
                Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => true,
                Err(_) => false,
            });
        }
    }
}
