//! Background receive task.

use tokio::sync::mpsc;
use tracing::debug;

use crate::errors::TransportError;
use crate::protocol::{decode_event, SlackEvent};
use crate::transport::EventSource;

pub(crate) type Received = Result<SlackEvent, TransportError>;

/// Pull frames off `source` and forward decoded events in arrival order.
///
/// Stops after forwarding the first transport error, or once the session
/// drops its receiver.
pub(crate) async fn receive_loop<S: EventSource>(mut source: S, events_tx: mpsc::Sender<Received>) {
    loop {
        let received = source.receive().await.map(|raw| decode_event(&raw));
        let fatal = received.is_err();

        if events_tx.send(received).await.is_err() {
            debug!("session gone, stopping receive task");
            return;
        }
        if fatal {
            return;
        }
    }
}
