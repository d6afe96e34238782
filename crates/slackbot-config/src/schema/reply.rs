use serde::{Deserialize, Serialize};

/// Where generated replies are sent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ReplyTarget {
    /// The channel the triggering message arrived on.
    #[default]
    SameChannel,
    /// Always `reply.channel`.
    Fixed,
}

/// Reply routing and filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyConfig {
    pub target: ReplyTarget,
    /// Destination channel id, required when `target = "fixed"`.
    pub channel: Option<String>,
    /// Skip messages the bot itself authored.
    pub ignore_own_messages: bool,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            target: ReplyTarget::SameChannel,
            channel: None,
            ignore_own_messages: true,
        }
    }
}
