//! Slack Real Time Messaging client and the bot session built on it.
//!
//! - [`handshake`] exchanges a token for a stream URL, identity and roster.
//! - [`transport`] connects the WebSocket and exposes it as a
//!   [`MessageSink`] / [`EventSource`] pair.
//! - [`session`] runs the dispatch loop: liveness pings on a fixed
//!   schedule, raced against inbound events that feed the text model.

pub mod errors;
pub mod handshake;
pub mod policy;
pub mod protocol;
pub mod session;
pub mod transport;

pub use errors::{HandshakeError, TransportError};
pub use handshake::{AuthenticatedUser, Channel, Roster, RtmSession, Team, User, WebApiClient};
pub use policy::{MentionPolicy, ReplyPolicy, ReplyRoute};
pub use protocol::{decode_event, OutgoingMessage, SlackError, SlackEvent};
pub use session::{Session, SessionOptions};
pub use transport::{connect, EventSource, MessageSink, WsSink, WsSource};
