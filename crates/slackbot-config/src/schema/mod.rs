//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod model;
mod reply;
mod session;
mod slack;

pub use logging::*;
pub use model::*;
pub use reply::*;
pub use session::*;
pub use slack::*;

use serde::{Deserialize, Serialize};

/// Root configuration for the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct BotConfig {
    pub slack: SlackConfig,
    pub session: SessionConfig,
    pub reply: ReplyConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}
