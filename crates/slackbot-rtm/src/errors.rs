use std::time::Duration;

use slackbot_common::BotError;
use tokio_tungstenite::tungstenite;

#[derive(Debug, thiserror::Error)]
pub enum HandshakeError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rtm.start rejected: {0}")]
    Rejected(String),

    #[error("invalid stream url: {0:?}")]
    InvalidUrl(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("connect timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("stream closed by peer")]
    Closed,
}

impl From<HandshakeError> for BotError {
    fn from(err: HandshakeError) -> Self {
        BotError::Handshake(err.to_string())
    }
}

impl From<TransportError> for BotError {
    fn from(err: TransportError) -> Self {
        BotError::Transport(err.to_string())
    }
}
