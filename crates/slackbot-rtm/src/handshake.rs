//! `rtm.start` handshake over the Slack Web API.
//!
//! Trades a bot token for the WebSocket URL of a fresh RTM stream, the
//! bot's own identity and a snapshot of the team's users and channels.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::HandshakeError;

/// The identity the token authenticates as.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthenticatedUser {
    pub id: String,
    pub name: String,
}

impl AuthenticatedUser {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub domain: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub name: String,
    pub deleted: bool,
    pub is_bot: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub is_member: bool,
    pub is_archived: bool,
}

/// Raw `rtm.start` response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RtmStartResponse {
    pub ok: bool,
    pub error: Option<String>,
    pub url: String,
    #[serde(rename = "self")]
    pub identity: AuthenticatedUser,
    pub team: Team,
    pub users: Vec<User>,
    pub channels: Vec<Channel>,
}

impl RtmStartResponse {
    /// Check the response and keep what the session needs.
    pub fn into_session(self) -> Result<RtmSession, HandshakeError> {
        if !self.ok {
            return Err(HandshakeError::Rejected(
                self.error.unwrap_or_else(|| "unknown_error".into()),
            ));
        }
        if !(self.url.starts_with("wss://") || self.url.starts_with("ws://")) {
            return Err(HandshakeError::InvalidUrl(self.url));
        }

        Ok(RtmSession {
            url: self.url,
            identity: self.identity,
            team: self.team,
            roster: Roster::new(self.users, self.channels),
        })
    }
}

/// Everything a successful handshake yields.
#[derive(Debug, Clone)]
pub struct RtmSession {
    pub url: String,
    pub identity: AuthenticatedUser,
    pub team: Team,
    pub roster: Roster,
}

/// Known users and channels, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    users: HashMap<String, User>,
    channels: HashMap<String, Channel>,
}

impl Roster {
    pub fn new(users: Vec<User>, channels: Vec<Channel>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            channels: channels.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    pub fn user_name(&self, id: &str) -> Option<&str> {
        self.users.get(id).map(|u| u.name.as_str())
    }

    pub fn channel_name(&self, id: &str) -> Option<&str> {
        self.channels.get(id).map(|c| c.name.as_str())
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Minimal Slack Web API client.
pub struct WebApiClient {
    api_base: String,
    http: reqwest::Client,
}

impl WebApiClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base)
    }

    /// Call `rtm.start` with `token`.
    pub async fn rtm_start(&self, token: &str) -> Result<RtmSession, HandshakeError> {
        let url = self.endpoint("rtm.start");
        debug!(url = %url, "requesting rtm.start");

        let response: RtmStartResponse = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let session = response.into_session()?;
        info!(
            user = %session.identity.name,
            team = %session.team.name,
            users = session.roster.user_count(),
            channels = session.roster.channel_count(),
            "rtm.start succeeded"
        );
        Ok(session)
    }
}
