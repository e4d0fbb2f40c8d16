//! Relay dispatcher: resolve-or-fallback forwarding between sessions.
//!
//! Each handler resolves its target connection through the presence registry
//! and forwards the payload, or emits the defined fallback to the sender's
//! registered connection. A missing target is never an error: it either
//! produces an offline notice or drops the event silently.

use tracing::debug;

use super::protocol::{
    CallOffer, ClientEvent, DirectMessage, IncomingMessage, OnlineUsers, ServerEvent,
};
use super::Session;

/// Handle one inbound event. Lookups and emits are synchronous and in-memory;
/// nothing here blocks, retries, or reports failure to the sender.
pub fn dispatch(session: &Session, event: ClientEvent) {
    match event {
        ClientEvent::AddUser(user_id) => {
            debug!("{} identified as {}", session.connection_id, user_id);
            session.registry.set(user_id, session.connection_id.clone());
            broadcast_online_users(session);
        }
        ClientEvent::Signout(user_id) => {
            debug!("{} signed out {}", session.connection_id, user_id);
            session.registry.remove(&user_id);
            broadcast_online_users(session);
        }
        ClientEvent::OutgoingVoiceCall(offer) => forward_or_offline(
            session,
            offer,
            ServerEvent::IncomingVoiceCall,
            ServerEvent::VoiceCallOffline,
        ),
        ClientEvent::OutgoingVideoCall(offer) => forward_or_offline(
            session,
            offer,
            ServerEvent::IncomingVideoCall,
            ServerEvent::VideoCallOffline,
        ),
        ClientEvent::RejectVoiceCall(reject) => {
            emit_to_user(session, &reject.from, ServerEvent::VoiceCallRejected)
        }
        ClientEvent::RejectVideoCall(reject) => {
            emit_to_user(session, &reject.from, ServerEvent::VideoCallRejected)
        }
        ClientEvent::AcceptIncomingCall(accept) => {
            emit_to_user(session, &accept.id, ServerEvent::AcceptCall)
        }
        ClientEvent::SendMsg(DirectMessage { to, from, message }) => {
            emit_to_user(session, &to, ServerEvent::MsgRecieve(IncomingMessage { from, message }))
        }
        ClientEvent::MarkRead(receipt) => {
            let target = receipt.id.clone();
            emit_to_user(session, &target, ServerEvent::MarkReadRecieve(receipt))
        }
    }
}

/// Broadcast the current online snapshot to every connection except the
/// originating one.
pub fn broadcast_online_users(session: &Session) {
    let event = ServerEvent::OnlineUsers(OnlineUsers {
        online_users: session.registry.snapshot(),
    });
    session.hub.broadcast_except(&session.connection_id, &event);
}

/// Forward a call offer to its resolved target, or notify the caller that the
/// target is offline. The offline notice goes to whichever connection `from`
/// is registered on; when `from` is itself unregistered it is dropped.
fn forward_or_offline(
    session: &Session,
    offer: CallOffer,
    forward: fn(CallOffer) -> ServerEvent,
    offline: ServerEvent,
) {
    match offer.target().and_then(|user| session.registry.lookup(user)) {
        Some(conn) => {
            debug!("relaying call offer on {} to {}", session.connection_id, conn);
            session.hub.emit_to(&conn, &forward(offer));
        }
        None => {
            if let Some(conn) = offer
                .from
                .as_deref()
                .and_then(|user| session.registry.lookup(user))
            {
                session.hub.emit_to(&conn, &offline);
            }
        }
    }
}

/// Unicast to the connection registered for `user_id`; silent drop when the
/// user is not present.
fn emit_to_user(session: &Session, user_id: &str, event: ServerEvent) {
    if let Some(conn) = session.registry.lookup(user_id) {
        session.hub.emit_to(&conn, &event);
    }
}
