//! Push delivery through the Expo relay, and the fan-out that decides who
//! gets what.

pub mod expo;
pub mod fanout;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The relay refuses requests with more messages than this.
pub const MAX_BATCH: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
    pub sound: &'static str,
    pub badge: u32,
    pub priority: &'static str,
    pub channel_id: &'static str,
}

impl PushMessage {
    pub fn new(to: impl Into<String>, title: String, body: String, data: serde_json::Value) -> Self {
        Self {
            to: to.into(),
            title,
            body,
            data,
            sound: "default",
            badge: 1,
            priority: "high",
            channel_id: "default",
        }
    }
}

/// The relay's synchronous answer for one message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PushTicket {
    Ok {
        id: String,
    },
    Error {
        message: String,
        #[serde(default)]
        details: Option<serde_json::Value>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("push relay rejected the request: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait PushSender: Send + Sync {
    /// Sends one batch of at most [`MAX_BATCH`] messages.
    async fn send(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError>;
}

/// Expo tokens look like `ExponentPushToken[...]` / `ExpoPushToken[...]`,
/// older clients send a bare UUID-shaped id.
pub fn is_push_token(token: &str) -> bool {
    let bracketed = (token.starts_with("ExponentPushToken[") || token.starts_with("ExpoPushToken["))
        && token.ends_with(']');
    bracketed || is_uuid_shaped(token)
}

fn is_uuid_shaped(token: &str) -> bool {
    let groups: Vec<&str> = token.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(group, len)| group.len() == len && group.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Sends `messages` in relay-sized chunks. A failed chunk is logged and
/// skipped; the others still go out.
pub async fn send_chunked(sender: &dyn PushSender, messages: &[PushMessage]) -> Vec<PushTicket> {
    let mut tickets = Vec::with_capacity(messages.len());
    for chunk in messages.chunks(MAX_BATCH) {
        match sender.send(chunk).await {
            Ok(chunk_tickets) => tickets.extend(chunk_tickets),
            Err(e) => tracing::error!(error = %e, size = chunk.len(), "push chunk failed"),
        }
    }
    tickets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_formats() {
        assert!(is_push_token("ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]"));
        assert!(is_push_token("ExpoPushToken[abc]"));
        assert!(is_push_token("1b2c3d4e-aaaa-bbbb-cccc-0123456789ab"));
        assert!(!is_push_token("ExponentPushToken[abc"));
        assert!(!is_push_token("fcm:abcdef"));
        assert!(!is_push_token(""));
        assert!(!is_push_token("1b2c3d4e-aaaa-bbbb-cccc-0123456789"));
    }

    #[test]
    fn tickets_parse_both_shapes() {
        let tickets: Vec<PushTicket> = serde_json::from_str(
            r#"[{"status":"ok","id":"XXXX-1"},
                {"status":"error","message":"not registered","details":{"error":"DeviceNotRegistered"}}]"#,
        )
        .unwrap();
        assert_eq!(tickets[0], PushTicket::Ok { id: "XXXX-1".into() });
        assert!(matches!(&tickets[1], PushTicket::Error { message, .. } if message == "not registered"));
    }

    #[test]
    fn message_serializes_in_relay_shape() {
        let msg = PushMessage::new(
            "ExpoPushToken[a]",
            "t".into(),
            "b".into(),
            serde_json::json!({"type": "assignment"}),
        );
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["to"], "ExpoPushToken[a]");
        assert_eq!(json["channelId"], "default");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["badge"], 1);
        assert_eq!(json["data"]["type"], "assignment");
    }
}
