//! Wire protocol for the relay socket.
//!
//! Frames are JSON text envelopes `{"event": <name>, "data": <payload>}`.
//! Event and field spellings (including `msg-recieve` and `recieverId`) are
//! fixed by deployed clients and must not be corrected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Call-offer payload. `to`/`from` route the call; any extra fields
/// (call type, SDP blobs, display names) ride along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallOffer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CallOffer {
    /// Target-resolution key for the outgoing-call handlers: `to` when
    /// present, else `from` — so a caller omitting `to` signals itself.
    /// Long-standing client contract, kept as-is.
    pub fn target(&self) -> Option<&str> {
        self.to.as_deref().or(self.from.as_deref())
    }
}

/// Payload of `reject-voice-call` / `reject-video-call`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallReject {
    pub from: String,
}

/// Payload of `accept-incoming-call`; `id` names the caller to notify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallAccept {
    pub id: String,
}

/// Payload of `send-msg`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub to: String,
    pub from: String,
    pub message: String,
}

/// Payload of `msg-recieve`: the delivered message, minus the routing `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub from: String,
    pub message: String,
}

/// Payload of `mark-read` / `mark-read-recieve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadReceipt {
    pub id: String,
    #[serde(rename = "recieverId")]
    pub reciever_id: String,
}

/// Payload of the `online-users` broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnlineUsers {
    #[serde(rename = "onlineUsers")]
    pub online_users: Vec<String>,
}

/// Client → server events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    AddUser(String),
    Signout(String),
    OutgoingVoiceCall(CallOffer),
    OutgoingVideoCall(CallOffer),
    RejectVoiceCall(CallReject),
    RejectVideoCall(CallReject),
    AcceptIncomingCall(CallAccept),
    SendMsg(DirectMessage),
    MarkRead(ReadReceipt),
}

/// Server → client events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    OnlineUsers(OnlineUsers),
    IncomingVoiceCall(CallOffer),
    IncomingVideoCall(CallOffer),
    VoiceCallOffline,
    VideoCallOffline,
    VoiceCallRejected,
    VideoCallRejected,
    AcceptCall,
    MsgRecieve(IncomingMessage),
    MarkReadRecieve(ReadReceipt),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_user_frame_carries_bare_user_id() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"add-user","data":"alice"}"#).unwrap();
        assert_eq!(event, ClientEvent::AddUser("alice".into()));
    }

    #[test]
    fn call_offer_preserves_extra_fields() {
        let frame = json!({
            "event": "outgoing-voice-call",
            "data": {"from": "alice", "roomId": "r-9", "sdp": "v=0"}
        });
        let event: ClientEvent = serde_json::from_value(frame).unwrap();
        let ClientEvent::OutgoingVoiceCall(offer) = event else {
            panic!("wrong variant");
        };
        assert_eq!(offer.target(), Some("alice"));
        assert_eq!(offer.extra["roomId"], json!("r-9"));

        let out = serde_json::to_value(ServerEvent::IncomingVoiceCall(offer)).unwrap();
        assert_eq!(out["event"], "incoming-voice-call");
        assert_eq!(out["data"]["sdp"], "v=0");
        assert!(out["data"].get("to").is_none());
    }

    #[test]
    fn unit_events_serialize_without_data() {
        let out = serde_json::to_value(ServerEvent::VoiceCallOffline).unwrap();
        assert_eq!(out, json!({"event": "voice-call-offline"}));
    }

    #[test]
    fn read_receipt_keeps_wire_spelling() {
        let out = serde_json::to_value(ServerEvent::MarkReadRecieve(ReadReceipt {
            id: "alice".into(),
            reciever_id: "bob".into(),
        }))
        .unwrap();
        assert_eq!(out["event"], "mark-read-recieve");
        assert_eq!(out["data"]["recieverId"], "bob");
    }

    #[test]
    fn unknown_event_fails_to_parse() {
        let err = serde_json::from_str::<ClientEvent>(r#"{"event":"nope","data":{}}"#);
        assert!(err.is_err());
    }
}
