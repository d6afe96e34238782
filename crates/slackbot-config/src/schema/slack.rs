use serde::{Deserialize, Serialize};

/// Slack Web API settings used for the `rtm.start` handshake.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Base URL of the Web API.
    pub api_base: String,
    /// Bot token. `--token` or `SLACK_TOKEN` take precedence.
    pub token: Option<String>,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_base: "https://slack.com/api".into(),
            token: None,
        }
    }
}
