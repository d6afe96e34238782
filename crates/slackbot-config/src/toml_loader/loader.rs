//! Core TOML config loading: read from path or platform default.

use crate::schema::BotConfig;
use slackbot_common::ConfigError;
use std::path::Path;
use tracing::info;

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// Validation is left to the caller.
pub fn load_from_path(path: &Path) -> Result<BotConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: BotConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/slackbot/config.toml`
/// On Linux: `~/.config/slackbot/config.toml`
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<BotConfig, ConfigError> {
    let path = default_config_path()?;
    load_or_create(&path)
}

pub(super) fn load_or_create(path: &Path) -> Result<BotConfig, ConfigError> {
    if path.exists() {
        return load_from_path(path);
    }

    info!("no config found at {}, creating default", path.display());
    if create_default_config(path)? {
        Ok(BotConfig::default())
    } else {
        load_from_path(path)
    }
}
