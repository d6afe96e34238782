//! RTM wire types.
//!
//! Outbound payloads are tagged by `type`. Inbound events are decoded
//! permissively: every field is optional on the wire, and a frame that
//! fails to decode becomes an empty event that nothing reacts to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slackbot_common::SequenceId;
use tracing::debug;

/// Event type carried by chat messages.
pub const MESSAGE_EVENT: &str = "message";

/// A payload the bot writes to the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutgoingMessage {
    Message {
        id: SequenceId,
        channel: String,
        text: String,
    },
    /// Liveness signal.
    Ping { id: SequenceId },
}

impl OutgoingMessage {
    pub fn id(&self) -> SequenceId {
        match self {
            Self::Message { id, .. } | Self::Ping { id } => *id,
        }
    }

    pub fn is_ping(&self) -> bool {
        matches!(self, Self::Ping { .. })
    }
}

/// Error object attached to failed replies and `error` events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SlackError {
    pub code: i64,
    #[serde(rename = "msg")]
    pub message: String,
}

/// An event read from the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SlackEvent {
    /// Only present on replies to messages the bot sent.
    pub ok: Option<bool>,
    #[serde(rename = "type")]
    pub kind: String,
    pub error: Option<SlackError>,
    #[serde(rename = "ts")]
    pub timestamp: String,
    pub text: String,
    pub channel: String,
    pub user: String,
    pub subtype: Option<String>,
    /// Sequence id of the payload this event acknowledges.
    pub reply_to: Option<u64>,
}

impl SlackEvent {
    pub fn is_message(&self) -> bool {
        self.kind == MESSAGE_EVENT
    }

    /// Server-side failure, either a rejected reply or an `error` event.
    pub fn is_error(&self) -> bool {
        self.ok == Some(false) || self.error.is_some()
    }

    /// Converts the `ts` field (`"<secs>.<micros>"`) into a UTC timestamp.
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        let (secs, frac) = match self.timestamp.split_once('.') {
            Some((secs, frac)) => (secs, frac),
            None => (self.timestamp.as_str(), ""),
        };
        let secs: i64 = secs.parse().ok()?;
        let micros: u32 = if frac.is_empty() {
            0
        } else {
            format!("{frac:0<6}").get(..6)?.parse().ok()?
        };
        DateTime::from_timestamp(secs, micros * 1_000)
    }
}

/// Decode one inbound frame. Undecodable frames yield an empty event.
pub fn decode_event(raw: &str) -> SlackEvent {
    match serde_json::from_str(raw) {
        Ok(event) => event,
        Err(e) => {
            debug!(error = %e, len = raw.len(), "dropping undecodable frame");
            SlackEvent::default()
        }
    }
}
