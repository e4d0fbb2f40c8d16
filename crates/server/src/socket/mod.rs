//! WebSocket transport: connection sessions and the event relay.
//!
//! Each client holds one long-lived socket. Inbound text frames are decoded
//! into [`protocol::ClientEvent`]s and run through [`relay::dispatch`];
//! outbound frames are queued on a per-connection channel drained by a writer
//! task, so a slow peer never blocks the relay path.

pub mod hub;
pub mod protocol;
pub mod relay;

pub use hub::SocketHub;

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::AppState;
use crate::presence::{ConnectionId, PresenceRegistry};
use protocol::ClientEvent;

/// One live client connection plus the shared state its handlers need.
/// Handlers operate only on their own session and the shared registry/hub.
pub struct Session {
    pub connection_id: ConnectionId,
    pub registry: Arc<PresenceRegistry>,
    pub hub: Arc<SocketHub>,
}

/// GET /ws — upgrade to the relay socket.
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let connection_id = state.hub.register(tx);
    info!("socket connected: {}", connection_id);

    let writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    let session = Session {
        connection_id: connection_id.clone(),
        registry: state.registry.clone(),
        hub: state.hub.clone(),
    };

    while let Some(msg) = stream.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                warn!("socket error on {}: {}", connection_id, e);
                break;
            }
        };
        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => relay::dispatch(&session, event),
                // A bad frame fails only its own invocation.
                Err(e) => warn!("ignoring malformed frame on {}: {}", connection_id, e),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    state.hub.unregister(&connection_id);
    if state.config.disconnect_cleanup {
        // Clients that vanish without a signout would otherwise leave stale
        // entries routing later relays to a dead connection.
        let stale = state.registry.remove_connection(&connection_id);
        if !stale.is_empty() {
            relay::broadcast_online_users(&session);
        }
    }
    let _ = writer.await;
    info!("socket disconnected: {}", connection_id);
}
