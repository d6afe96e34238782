//! Full configuration validation.
//!
//! Validates numeric ranges, URL schemes and channel id formats.

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::{BotConfig, ReplyTarget};
use slackbot_common::ConfigError;

/// Public channels, private groups and direct messages.
static CHANNEL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[CGD][A-Z0-9]{2,}$").unwrap());

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &BotConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    let api_base = &config.slack.api_base;
    if !(api_base.starts_with("https://") || api_base.starts_with("http://")) {
        errors.push(format!("slack.api_base = {api_base:?} must be an http(s) URL"));
    }
    if matches!(&config.slack.token, Some(t) if t.trim().is_empty()) {
        errors.push("slack.token must not be empty".into());
    }

    validate_range(
        &mut errors,
        "session.ping_interval_secs",
        config.session.ping_interval_secs,
        1,
        300,
    );
    validate_range(
        &mut errors,
        "session.connect_timeout_secs",
        config.session.connect_timeout_secs,
        1,
        120,
    );
    if let Some(channel) = &config.session.greet_channel {
        validate_channel(&mut errors, "session.greet_channel", channel);
    }

    match (&config.reply.target, &config.reply.channel) {
        (ReplyTarget::Fixed, None) => {
            errors.push("reply.channel is required when reply.target = \"fixed\"".into());
        }
        (_, Some(channel)) => validate_channel(&mut errors, "reply.channel", channel),
        (ReplyTarget::SameChannel, None) => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

fn validate_channel(errors: &mut Vec<String>, name: &str, value: &str) {
    if !CHANNEL_ID_RE.is_match(value) {
        errors.push(format!("{name} = {value:?} is not a channel id"));
    }
}
