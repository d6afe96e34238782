//! WebSocket transport for the RTM stream.
//!
//! The session talks to the stream only through [`MessageSink`] and
//! [`EventSource`], so the write half stays with the dispatch loop while
//! the read half moves into the receive task.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use crate::errors::TransportError;
use crate::protocol::OutgoingMessage;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write side of the stream.
#[async_trait]
pub trait MessageSink: Send {
    /// Returns once the payload has been handed to the transport.
    async fn send(&mut self, message: &OutgoingMessage) -> Result<(), TransportError>;
}

/// Read side of the stream.
#[async_trait]
pub trait EventSource: Send + 'static {
    /// Wait for the next text frame.
    async fn receive(&mut self) -> Result<String, TransportError>;
}

/// Open the RTM WebSocket at `url`, giving up after `timeout`.
pub async fn connect(url: &str, timeout: Duration) -> Result<(WsSink, WsSource), TransportError> {
    info!(url = %url.split('?').next().unwrap_or(""), "connecting to RTM stream");

    let (ws_stream, _) = tokio::time::timeout(timeout, tokio_tungstenite::connect_async(url))
        .await
        .map_err(|_elapsed| TransportError::Timeout(timeout))??;

    let (write, read) = ws_stream.split();
    Ok((WsSink { inner: write }, WsSource { inner: read }))
}

pub struct WsSink {
    inner: SplitSink<WsStream, WsMessage>,
}

#[async_trait]
impl MessageSink for WsSink {
    async fn send(&mut self, message: &OutgoingMessage) -> Result<(), TransportError> {
        let json = serde_json::to_string(message)?;
        self.inner.send(WsMessage::Text(json.into())).await?;
        Ok(())
    }
}

pub struct WsSource {
    inner: SplitStream<WsStream>,
}

#[async_trait]
impl EventSource for WsSource {
    async fn receive(&mut self) -> Result<String, TransportError> {
        loop {
            match self.inner.next().await {
                Some(Ok(WsMessage::Text(text))) => return Ok(text.to_string()),
                Some(Ok(WsMessage::Binary(data))) => {
                    return Ok(String::from_utf8_lossy(&data).into_owned());
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!(frame = ?frame, "RTM stream sent close frame");
                    return Err(TransportError::Closed);
                }
                // Control frames; pongs are queued by tungstenite itself.
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
                None => return Err(TransportError::Closed),
            }
        }
    }
}
