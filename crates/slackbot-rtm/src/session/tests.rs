//! Session loop tests driven by in-memory transports and paused time.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use slackbot_markov::{TextModel, Token};
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::*;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

type Sent = Arc<Mutex<Vec<(Instant, OutgoingMessage)>>>;

/// Records every payload with the (virtual) time it was sent.
struct RecordingSink {
    sent: Sent,
    fail: bool,
    /// Hold each chat message this long before it counts as sent.
    slow_messages: Option<Duration>,
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send(&mut self, message: &OutgoingMessage) -> Result<(), TransportError> {
        if self.fail {
            return Err(TransportError::Closed);
        }
        if let (Some(delay), OutgoingMessage::Message { .. }) = (self.slow_messages, message) {
            tokio::time::sleep(delay).await;
        }
        self.sent
            .lock()
            .unwrap()
            .push((Instant::now(), message.clone()));
        Ok(())
    }
}

/// Yields whatever the test pushes; waits forever once the script runs dry.
struct ScriptedSource {
    frames: mpsc::UnboundedReceiver<Result<String, TransportError>>,
    _alive: Arc<()>,
}

#[async_trait]
impl EventSource for ScriptedSource {
    async fn receive(&mut self) -> Result<String, TransportError> {
        match self.frames.recv().await {
            Some(frame) => frame,
            None => std::future::pending().await,
        }
    }
}

struct Harness {
    session: Session<RecordingSink>,
    sent: Sent,
    frames: mpsc::UnboundedSender<Result<String, TransportError>>,
    /// Shared with the source; the count drops back to 1 once it is gone.
    source_alive: Arc<()>,
}

const BOT_ID: &str = "UBOT";

fn harness(options: SessionOptions) -> Harness {
    harness_with_sink(options, false)
}

fn harness_with_sink(options: SessionOptions, fail: bool) -> Harness {
    build_harness(options, fail, None)
}

fn build_harness(
    options: SessionOptions,
    fail: bool,
    slow_messages: Option<Duration>,
) -> Harness {
    let sent: Sent = Arc::default();
    let source_alive = Arc::new(());
    let (frames, frames_rx) = mpsc::unbounded_channel();
    let session = Session::start(
        RecordingSink {
            sent: Arc::clone(&sent),
            fail,
            slow_messages,
        },
        ScriptedSource {
            frames: frames_rx,
            _alive: Arc::clone(&source_alive),
        },
        AuthenticatedUser::new(BOT_ID, "bobby"),
        TextModel::new(),
        options,
    );
    Harness {
        session,
        sent,
        frames,
        source_alive,
    }
}

fn ping_times(sent: &Sent, start: Instant) -> Vec<Duration> {
    sent.lock()
        .unwrap()
        .iter()
        .filter(|(_, m)| m.is_ping())
        .map(|(at, _)| at.duration_since(start))
        .collect()
}

fn message_frame(text: &str, channel: &str, user: &str) -> Result<String, TransportError> {
    Ok(serde_json::json!({
        "type": "message",
        "text": text,
        "channel": channel,
        "user": user,
        "ts": "1355517523.000005",
    })
    .to_string())
}

fn sent_messages(sent: &Sent) -> Vec<OutgoingMessage> {
    sent.lock().unwrap().iter().map(|(_, m)| m.clone()).collect()
}

fn replies(sent: &Sent) -> Vec<(String, String)> {
    sent_messages(sent)
        .into_iter()
        .filter_map(|m| match m {
            OutgoingMessage::Message { channel, text, .. } => Some((channel, text)),
            OutgoingMessage::Ping { .. } => None,
        })
        .collect()
}

/// Run the loop for `secs` of virtual time and assert it is still alive.
async fn run_for(session: &mut Session<RecordingSink>, secs: u64) {
    let outcome = tokio::time::timeout(Duration::from_secs(secs), session.run()).await;
    assert!(outcome.is_err(), "session loop ended early: {outcome:?}");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn pings_follow_fixed_schedule_under_traffic() {
    let mut h = harness(SessionOptions::default());
    let start = Instant::now();

    let frames = h.frames.clone();
    tokio::spawn(async move {
        for i in 0..30 {
            tokio::time::sleep(Duration::from_secs(3)).await;
            let _ = frames.send(message_frame(&format!("chatter number {i}"), "C1", "U1"));
        }
    });

    run_for(&mut h.session, 101).await;

    let pings = ping_times(&h.sent, start);

    assert_eq!(pings.len(), 5);
    for (i, at) in pings.iter().enumerate() {
        let expected = Duration::from_secs(20 * (i as u64 + 1));
        let drift = if *at > expected {
            *at - expected
        } else {
            expected - *at
        };
        assert!(drift <= Duration::from_millis(5), "ping {i} at {at:?}");
    }
    assert_eq!(h.session.model().observations(), 30);
}

#[tokio::test(start_paused = true)]
async fn pings_keep_going_on_a_silent_stream() {
    let mut h = harness(SessionOptions {
        ping_interval: Duration::from_secs(2),
        ..Default::default()
    });

    run_for(&mut h.session, 11).await;

    let sent = sent_messages(&h.sent);
    assert_eq!(sent.len(), 5);
    assert!(sent.iter().all(OutgoingMessage::is_ping));
}

#[tokio::test(start_paused = true)]
async fn missed_ticks_delay_the_schedule_without_a_burst() {
    let mut h = build_harness(
        SessionOptions::default(),
        false,
        Some(Duration::from_secs(45)),
    );
    let start = Instant::now();
    h.frames
        .send(message_frame("<@UBOT> are you busy", "C1", "U1"))
        .unwrap();

    // The reply blocks the loop from 0s to 45s, across the 20s and 40s ticks.
    run_for(&mut h.session, 100).await;

    assert_eq!(replies(&h.sent).len(), 1);
    assert_eq!(
        ping_times(&h.sent, start),
        vec![
            Duration::from_secs(45),
            Duration::from_secs(65),
            Duration::from_secs(85),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn mention_triggers_reply_from_learned_table() {
    let mut h = harness(SessionOptions::default());
    h.frames
        .send(message_frame("Hello there friend", "C1", "U1"))
        .unwrap();
    h.frames
        .send(message_frame("friend <@UBOT> hi", "C1", "U1"))
        .unwrap();

    run_for(&mut h.session, 1).await;

    let model = h.session.model();
    assert_eq!(model.observations(), 2);

    let replies = replies(&h.sent);
    assert_eq!(replies.len(), 1);
    let (channel, text) = &replies[0];
    assert_eq!(channel, "C1");

    let words: Vec<&str> = text.split(' ').collect();
    assert!(model.successors(&Token::Begin).contains(&Token::word(words[0])));
    for pair in words.windows(2) {
        assert!(model
            .successors(&Token::word(pair[0]))
            .contains(&Token::word(pair[1])));
    }
    let last = Token::word(*words.last().unwrap());
    assert!(model.successors(&last).contains(&Token::End));
}

#[tokio::test(start_paused = true)]
async fn no_mention_means_no_reply() {
    let mut h = harness(SessionOptions::default());
    h.frames
        .send(message_frame("just talking <@UOTHER>", "C1", "U1"))
        .unwrap();

    run_for(&mut h.session, 1).await;

    assert_eq!(h.session.model().observations(), 1);
    assert!(replies(&h.sent).is_empty());
}

#[tokio::test(start_paused = true)]
async fn malformed_frame_is_skipped() {
    let mut h = harness(SessionOptions::default());
    h.frames.send(Ok("{this is not json".into())).unwrap();
    h.frames
        .send(message_frame("still learning", "C1", "U1"))
        .unwrap();

    run_for(&mut h.session, 1).await;

    assert_eq!(h.session.model().observations(), 1);
}

#[tokio::test(start_paused = true)]
async fn non_message_events_are_not_learned() {
    let mut h = harness(SessionOptions::default());
    h.frames.send(Ok(r#"{"type":"hello"}"#.into())).unwrap();
    h.frames
        .send(Ok(
            r#"{"type":"user_typing","channel":"C1","user":"U1","text":"<@UBOT>"}"#.into(),
        ))
        .unwrap();

    run_for(&mut h.session, 1).await;

    assert_eq!(h.session.model().observations(), 0);
    assert!(sent_messages(&h.sent).is_empty());
}

#[tokio::test(start_paused = true)]
async fn server_errors_are_absorbed() {
    let mut h = harness(SessionOptions::default());
    h.frames
        .send(Ok(
            r#"{"ok":false,"reply_to":1,"error":{"code":2,"msg":"message text is missing"}}"#
                .into(),
        ))
        .unwrap();
    h.frames
        .send(message_frame("after the error", "C1", "U1"))
        .unwrap();

    run_for(&mut h.session, 1).await;

    assert_eq!(h.session.model().observations(), 1);
}

#[tokio::test(start_paused = true)]
async fn own_messages_are_ignored() {
    let mut h = harness(SessionOptions::default());
    h.frames
        .send(message_frame("talking to myself <@UBOT>", "C1", BOT_ID))
        .unwrap();

    run_for(&mut h.session, 1).await;

    assert_eq!(h.session.model().observations(), 0);
    assert!(replies(&h.sent).is_empty());
}

#[tokio::test(start_paused = true)]
async fn own_messages_learned_when_filter_disabled() {
    let mut h = harness(SessionOptions {
        ignore_own_messages: false,
        ..Default::default()
    });
    h.frames
        .send(message_frame("talking to myself", "C1", BOT_ID))
        .unwrap();

    run_for(&mut h.session, 1).await;

    assert_eq!(h.session.model().observations(), 1);
}

#[tokio::test(start_paused = true)]
async fn fixed_route_overrides_origin_channel() {
    let mut h = harness(SessionOptions {
        reply_route: ReplyRoute::Fixed("C08K8V7GV".into()),
        ..Default::default()
    });
    h.frames
        .send(message_frame("<@UBOT>", "C1", "U1"))
        .unwrap();

    run_for(&mut h.session, 1).await;

    let replies = replies(&h.sent);
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].0, "C08K8V7GV");
}

#[tokio::test(start_paused = true)]
async fn custom_policy_replaces_mentions() {
    let h = harness(SessionOptions::default());
    let mut session = h
        .session
        .with_policy(|event: &SlackEvent| event.text.ends_with('?'));
    h.frames
        .send(message_frame("anyone there?", "C1", "U1"))
        .unwrap();
    h.frames
        .send(message_frame("<@UBOT> not a question", "C1", "U1"))
        .unwrap();

    run_for(&mut session, 1).await;

    assert_eq!(replies(&h.sent).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn sequence_ids_strictly_increase() {
    let mut h = harness(SessionOptions {
        ping_interval: Duration::from_secs(1),
        ..Default::default()
    });
    let frames = h.frames.clone();
    tokio::spawn(async move {
        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            let _ = frames.send(message_frame("<@UBOT>", "C1", "U1"));
        }
    });

    run_for(&mut h.session, 6).await;

    let ids: Vec<u64> = sent_messages(&h.sent)
        .iter()
        .map(|m| m.id().get())
        .collect();
    assert!(ids.len() >= 8, "ids: {ids:?}");
    assert_eq!(ids[0], 1);
    assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids: {ids:?}");
}

#[tokio::test]
async fn greeting_goes_to_configured_channel() {
    let mut h = harness(SessionOptions {
        greet_channel: Some("CGREET".into()),
        ..Default::default()
    });

    h.session.greet().await.unwrap();

    let sent = sent_messages(&h.sent);
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        OutgoingMessage::Message { id, channel, text } => {
            assert_eq!(id.get(), 1);
            assert_eq!(channel, "CGREET");
            assert_eq!(text, "Hello, World!");
        }
        other => panic!("expected a message, got {other:?}"),
    }
}

#[tokio::test]
async fn no_greeting_without_channel() {
    let mut h = harness(SessionOptions::default());
    h.session.greet().await.unwrap();
    assert!(sent_messages(&h.sent).is_empty());
}

#[tokio::test(start_paused = true)]
async fn source_error_ends_the_loop() {
    let mut h = harness(SessionOptions::default());
    h.frames
        .send(message_frame("last words", "C1", "U1"))
        .unwrap();
    h.frames.send(Err(TransportError::Closed)).unwrap();

    let result = h.session.run().await;

    assert!(matches!(result, Err(TransportError::Closed)));
    assert_eq!(h.session.model().observations(), 1);
}

#[tokio::test(start_paused = true)]
async fn sink_error_ends_the_loop() {
    let mut h = harness_with_sink(
        SessionOptions {
            ping_interval: Duration::from_secs(1),
            ..Default::default()
        },
        true,
    );

    let result = tokio::time::timeout(Duration::from_secs(5), h.session.run()).await;

    assert!(matches!(result, Ok(Err(TransportError::Closed))));
}

#[tokio::test(start_paused = true)]
async fn reply_send_error_ends_the_loop() {
    let mut h = harness_with_sink(SessionOptions::default(), true);
    h.frames
        .send(message_frame("<@UBOT> hi", "C1", "U1"))
        .unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), h.session.run()).await;

    assert!(matches!(result, Ok(Err(TransportError::Closed))));
}

#[tokio::test(start_paused = true)]
async fn receive_task_is_stopped_when_the_loop_ends() {
    let mut h = harness_with_sink(
        SessionOptions {
            ping_interval: Duration::from_secs(1),
            ..Default::default()
        },
        true,
    );
    assert_eq!(Arc::strong_count(&h.source_alive), 2);

    let result = h.session.run().await;

    assert!(matches!(result, Err(TransportError::Closed)));
    // The session is still alive here; only the receive task has gone.
    assert_eq!(Arc::strong_count(&h.source_alive), 1);
    assert!(matches!(h.session.run().await, Err(TransportError::Closed)));
}
