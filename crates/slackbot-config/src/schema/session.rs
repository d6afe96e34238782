use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Stream session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds between liveness pings (valid range: 1-300).
    pub ping_interval_secs: u64,
    /// Seconds allowed for the WebSocket connect (valid range: 1-120).
    pub connect_timeout_secs: u64,
    /// Channel that receives one generated greeting right after connecting.
    pub greet_channel: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ping_interval_secs: 20,
            connect_timeout_secs: 15,
            greet_channel: None,
        }
    }
}

impl SessionConfig {
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
