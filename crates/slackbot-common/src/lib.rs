pub mod errors;
pub mod id;

pub use errors::{BotError, ConfigError};
pub use id::{SequenceCounter, SequenceId};
