//! Where the config lives, and writing the commented template there.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use slackbot_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "slackbot";
const FILE_NAME: &str = "config.toml";

/// `<config dir>/slackbot/config.toml` for the current platform.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or_else(|| ConfigError::ParseError("no config directory on this platform".into()))
}

/// Write the template to `path`, creating parent directories as needed.
///
/// Returns `Ok(false)` without touching anything if a file is already
/// there, so a config written between the existence check and this call
/// survives.
pub fn create_default_config(path: &Path) -> Result<bool, ConfigError> {
    let write_err = |e: std::io::Error| {
        ConfigError::ParseError(format!("cannot write {}: {e}", path.display()))
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(write_err(e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(write_err)?;

    info!(path = %path.display(), "wrote default config");
    Ok(true)
}
