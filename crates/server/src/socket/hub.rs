//! Connection hub: unicast and broadcast-except-self addressing over live
//! sockets. Delivery is fire-and-forget; a send to a closing connection is
//! silently dropped.

use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use super::protocol::ServerEvent;
use crate::presence::ConnectionId;

/// Outbound frame queue for one connection; drained by its writer task.
pub type OutboundTx = mpsc::UnboundedSender<String>;

#[derive(Default)]
pub struct SocketHub {
    connections: RwLock<HashMap<ConnectionId, OutboundTx>>,
}

impl SocketHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection's outbound queue and assign it an id.
    pub fn register(&self, tx: OutboundTx) -> ConnectionId {
        let connection_id = Uuid::new_v4().to_string();
        self.connections.write().insert(connection_id.clone(), tx);
        connection_id
    }

    pub fn unregister(&self, connection_id: &str) {
        self.connections.write().remove(connection_id);
    }

    pub fn connection_count(&self) -> usize {
        self.connections.read().len()
    }

    /// Unicast `event` to one connection by id.
    pub fn emit_to(&self, connection_id: &str, event: &ServerEvent) {
        let Some(frame) = encode(event) else { return };
        if let Some(tx) = self.connections.read().get(connection_id) {
            let _ = tx.send(frame);
        }
    }

    /// Send `event` to every connection except `origin`.
    pub fn broadcast_except(&self, origin: &str, event: &ServerEvent) {
        let Some(frame) = encode(event) else { return };
        for (connection_id, tx) in self.connections.read().iter() {
            if connection_id != origin {
                let _ = tx.send(frame.clone());
            }
        }
    }
}

fn encode(event: &ServerEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(frame) => Some(frame),
        Err(e) => {
            warn!("failed to encode outbound event: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::socket::protocol::OnlineUsers;

    #[test]
    fn broadcast_skips_the_origin_connection() {
        tokio_test::block_on(async {
            let hub = SocketHub::new();
            let (tx_a, mut rx_a) = mpsc::unbounded_channel();
            let (tx_b, mut rx_b) = mpsc::unbounded_channel();
            let a = hub.register(tx_a);
            let _b = hub.register(tx_b);
            assert_eq!(hub.connection_count(), 2);

            let event = ServerEvent::OnlineUsers(OnlineUsers {
                online_users: vec!["alice".into()],
            });
            hub.broadcast_except(&a, &event);

            assert!(rx_a.try_recv().is_err());
            let frame = rx_b.try_recv().unwrap();
            assert!(frame.contains("online-users"));
        });
    }

    #[test]
    fn emit_to_unknown_connection_is_dropped() {
        let hub = SocketHub::new();
        hub.emit_to("gone", &ServerEvent::AcceptCall);
        hub.unregister("gone");
    }
}
