//! Bot configuration.
//!
//! TOML-based configuration with validation. Every section uses serde
//! defaults, so an empty file (or no file at all) yields a working setup
//! apart from the Slack token.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use slackbot_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("pinging every {:?}", config.session.ping_interval());
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    BotConfig, LogLevel, LoggingConfig, ModelConfig, ReplyConfig, ReplyTarget, SessionConfig,
    SlackConfig,
};

use std::path::Path;

use slackbot_common::ConfigError;

/// Load config from `path`, or from the platform default path when `None`.
///
/// The default file is created from a commented template if missing. An
/// explicitly named file must exist. The result is validated.
pub fn load_config(path: Option<&Path>) -> Result<BotConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            toml_loader::load_from_path(path)?
        }
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}
