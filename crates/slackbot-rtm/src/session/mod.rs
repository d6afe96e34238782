//! The bot session: one stream, one dispatch loop.
//!
//! A single receive task owns the read half of the stream and forwards
//! decoded events over a channel. The dispatch loop races that channel
//! against the liveness timer with `tokio::select!`, so a quiet stream
//! never delays a ping and a ping never drops an event. The text model is
//! touched only from the dispatch loop.

mod receiver;

#[cfg(test)]
mod tests;

use std::time::Duration;

use slackbot_common::SequenceCounter;
use slackbot_markov::TextModel;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::errors::TransportError;
use crate::handshake::{AuthenticatedUser, Roster};
use crate::policy::{MentionPolicy, ReplyPolicy, ReplyRoute};
use crate::protocol::{OutgoingMessage, SlackEvent};
use crate::transport::{EventSource, MessageSink};

use receiver::{receive_loop, Received};

const EVENT_BUFFER: usize = 64;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Behavior knobs for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Time between liveness pings.
    pub ping_interval: Duration,
    pub reply_route: ReplyRoute,
    /// Channel for the greeting sent by [`Session::greet`].
    pub greet_channel: Option<String>,
    /// Skip messages authored by the bot itself.
    pub ignore_own_messages: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(20),
            reply_route: ReplyRoute::SameChannel,
            greet_channel: None,
            ignore_own_messages: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session<K: MessageSink> {
    sink: K,
    events_rx: mpsc::Receiver<Received>,
    receiver: Option<JoinHandle<()>>,
    identity: AuthenticatedUser,
    roster: Roster,
    model: TextModel,
    policy: Box<dyn ReplyPolicy>,
    sequence: SequenceCounter,
    options: SessionOptions,
}

impl<K: MessageSink> Session<K> {
    /// Take ownership of both stream halves and start the receive task.
    ///
    /// The default reply policy answers messages that mention `identity`.
    pub fn start<S: EventSource>(
        sink: K,
        source: S,
        identity: AuthenticatedUser,
        model: TextModel,
        options: SessionOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let receiver = tokio::spawn(receive_loop(source, events_tx));

        Self {
            sink,
            events_rx,
            receiver: Some(receiver),
            policy: Box::new(MentionPolicy::new(&identity.id)),
            identity,
            roster: Roster::default(),
            model,
            sequence: SequenceCounter::new(),
            options,
        }
    }

    pub fn with_policy(mut self, policy: impl ReplyPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn with_roster(mut self, roster: Roster) -> Self {
        self.roster = roster;
        self
    }

    pub fn model(&self) -> &TextModel {
        &self.model
    }

    pub fn identity(&self) -> &AuthenticatedUser {
        &self.identity
    }

    /// Post one generated message to the greeting channel, if configured.
    pub async fn greet(&mut self) -> Result<(), TransportError> {
        let Some(channel) = self.options.greet_channel.clone() else {
            return Ok(());
        };
        match self.model.generate() {
            Ok(text) => self.send_text(channel, text).await,
            Err(e) => {
                warn!(error = %e, "skipping greeting");
                Ok(())
            }
        }
    }

    /// Run until the stream fails. Only ever returns an error.
    ///
    /// The receive task is stopped before this returns, so the read half of
    /// the stream is released even if the session itself is kept around.
    pub async fn run(&mut self) -> Result<(), TransportError> {
        let result = self.run_loop().await;
        if let Some(handle) = self.receiver.take() {
            handle.abort();
            let _ = handle.await;
            debug!("receive task stopped");
        }
        result
    }

    async fn run_loop(&mut self) -> Result<(), TransportError> {
        let period = self.options.ping_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            user = %self.identity.name,
            ping_secs = period.as_secs_f64(),
            "session loop started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => self.ping().await?,
                received = self.events_rx.recv() => match received {
                    Some(Ok(event)) => self.dispatch(event).await?,
                    Some(Err(e)) => return Err(e),
                    None => return Err(TransportError::Closed),
                },
            }
        }
    }

    async fn dispatch(&mut self, event: SlackEvent) -> Result<(), TransportError> {
        if event.is_error() {
            let error = event.error.unwrap_or_default();
            warn!(
                reply_to = ?event.reply_to,
                code = error.code,
                message = %error.message,
                "server reported an error"
            );
            return Ok(());
        }
        if !event.is_message() {
            if !event.kind.is_empty() {
                debug!(kind = %event.kind, "ignoring event");
            }
            return Ok(());
        }
        if self.options.ignore_own_messages && event.user == self.identity.id {
            debug!(channel = %event.channel, "ignoring own message");
            return Ok(());
        }

        debug!(
            channel = self.roster.channel_name(&event.channel).unwrap_or(&event.channel),
            user = self.roster.user_name(&event.user).unwrap_or(&event.user),
            sent_at = ?event.sent_at(),
            "message received"
        );
        self.model.observe(&event.text);

        if !self.policy.should_reply(&event) {
            return Ok(());
        }
        let Some(channel) = self.options.reply_route.destination(&event) else {
            warn!("reply triggered but no destination channel is known");
            return Ok(());
        };
        let channel = channel.to_string();

        match self.model.generate() {
            Ok(text) => self.send_text(channel, text).await,
            Err(e) => {
                warn!(error = %e, "skipping reply");
                Ok(())
            }
        }
    }

    async fn ping(&mut self) -> Result<(), TransportError> {
        let id = self.sequence.next_id();
        debug!(id = %id, "ping");
        self.sink.send(&OutgoingMessage::Ping { id }).await
    }

    async fn send_text(&mut self, channel: String, text: String) -> Result<(), TransportError> {
        let id = self.sequence.next_id();
        info!(id = %id, channel = %channel, text = %text, "sending message");
        self.sink
            .send(&OutgoingMessage::Message { id, channel, text })
            .await
    }
}

impl<K: MessageSink> Drop for Session<K> {
    fn drop(&mut self) {
        if let Some(handle) = &self.receiver {
            handle.abort();
        }
    }
}
