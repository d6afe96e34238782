use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("missing credential: {0}")]
    MissingToken(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("handshake error: {0}")]
    Handshake(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl BotError {
    /// Whether the error happened before the session loop started.
    pub fn is_startup(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Handshake(_))
    }
}
