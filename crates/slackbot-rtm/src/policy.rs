//! Deciding whether to answer a message, and where.

use crate::protocol::SlackEvent;

/// Decides whether an observed chat message deserves a reply.
pub trait ReplyPolicy: Send {
    fn should_reply(&self, event: &SlackEvent) -> bool;
}

impl<F> ReplyPolicy for F
where
    F: Fn(&SlackEvent) -> bool + Send,
{
    fn should_reply(&self, event: &SlackEvent) -> bool {
        self(event)
    }
}

/// Replies when the message mentions the bot, as `<@ID>` or `<@ID|name>`.
#[derive(Debug, Clone)]
pub struct MentionPolicy {
    plain: String,
    labelled: String,
}

impl MentionPolicy {
    pub fn new(user_id: &str) -> Self {
        Self {
            plain: format!("<@{user_id}>"),
            labelled: format!("<@{user_id}|"),
        }
    }

    pub fn mentions(&self, text: &str) -> bool {
        text.contains(&self.plain) || text.contains(&self.labelled)
    }
}

impl ReplyPolicy for MentionPolicy {
    fn should_reply(&self, event: &SlackEvent) -> bool {
        self.mentions(&event.text)
    }
}

/// Where replies go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReplyRoute {
    /// Back to the channel the trigger arrived on.
    #[default]
    SameChannel,
    /// Always to one channel.
    Fixed(String),
}

impl ReplyRoute {
    /// Channel a reply to `event` is sent to, if one is known.
    pub fn destination<'a>(&'a self, event: &'a SlackEvent) -> Option<&'a str> {
        match self {
            Self::SameChannel if event.channel.is_empty() => None,
            Self::SameChannel => Some(&event.channel),
            Self::Fixed(channel) => Some(channel),
        }
    }
}
