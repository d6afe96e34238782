//! slackbot: connects to Slack RTM, learns from every message it sees and
//! answers mentions with Markov-generated text.

mod cli;

use std::process::ExitCode;

use slackbot_common::{BotError, ConfigError};
use slackbot_config::{BotConfig, ReplyTarget};
use slackbot_markov::TextModel;
use slackbot_rtm::{ReplyRoute, Session, SessionOptions, WebApiClient};
use tracing::{debug, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

const DEFAULT_DIRECTIVE: &str = "slackbot=info";

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Filter used from process start until the config file has been read.
///
/// `RUST_LOG` beats `--log-level`, which beats the default.
fn startup_directive(rust_log: Option<&str>, cli_level: Option<&str>) -> String {
    match (rust_log, cli_level) {
        (Some(env), _) => env.to_string(),
        (None, Some(level)) => format!("slackbot={level}"),
        (None, None) => DEFAULT_DIRECTIVE.to_string(),
    }
}

/// Filter to switch to once the config is loaded, if nothing outranks it.
fn config_directive(
    rust_log: Option<&str>,
    cli_level: Option<&str>,
    config: &BotConfig,
) -> Option<String> {
    if rust_log.is_some() || cli_level.is_some() {
        return None;
    }
    Some(format!("slackbot={}", config.logging.level.as_str()))
}

fn filter_for(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber with a filter that can be swapped later.
fn init_logging(directive: &str) -> FilterHandle {
    let (filter, handle) = reload::Layer::new(filter_for(directive));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
    handle
}

fn apply_directive(handle: &FilterHandle, directive: &str) {
    match handle.reload(filter_for(directive)) {
        Ok(()) => debug!(directive, "log filter updated from config"),
        Err(e) => warn!(error = %e, "could not update log filter"),
    }
}

/// `--token` / `SLACK_TOKEN` first, then the config file.
fn resolve_token(args: &cli::Args, config: &BotConfig) -> Result<String, ConfigError> {
    args.token
        .clone()
        .or_else(|| config.slack.token.clone())
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            ConfigError::MissingToken(
                "pass --token, set SLACK_TOKEN, or set slack.token in the config".into(),
            )
        })
}

fn session_options(config: &BotConfig) -> SessionOptions {
    let reply_route = match (config.reply.target, &config.reply.channel) {
        (ReplyTarget::Fixed, Some(channel)) => ReplyRoute::Fixed(channel.clone()),
        _ => ReplyRoute::SameChannel,
    };
    SessionOptions {
        ping_interval: config.session.ping_interval(),
        reply_route,
        greet_channel: config.session.greet_channel.clone(),
        ignore_own_messages: config.reply.ignore_own_messages,
    }
}

async fn run(config: BotConfig, token: String) -> Result<(), BotError> {
    let api = WebApiClient::new(config.slack.api_base.as_str());
    let rtm = api.rtm_start(&token).await?;

    let (sink, source) =
        slackbot_rtm::connect(&rtm.url, config.session.connect_timeout()).await?;

    let model = TextModel::new().with_max_steps(config.model.max_steps());
    let mut session = Session::start(sink, source, rtm.identity, model, session_options(&config))
        .with_roster(rtm.roster);

    session.greet().await?;
    session.run().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    let rust_log = std::env::var("RUST_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty());
    let cli_level = args.log_level.as_deref();

    // Logging has to be up before the config loader runs so that its
    // messages (like creating the default file) are not lost.
    let filter = init_logging(&startup_directive(rust_log.as_deref(), cli_level));

    let config = slackbot_config::load_config(args.config.as_deref());
    if let Ok(config) = &config {
        if let Some(directive) = config_directive(rust_log.as_deref(), cli_level, config) {
            apply_directive(&filter, &directive);
        }
    }

    let result = match config {
        Ok(config) => match resolve_token(&args, &config) {
            Ok(token) => run(config, token).await,
            Err(e) => Err(e.into()),
        },
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let stage = if e.is_startup() { "startup" } else { "session" };
            tracing::error!(stage, error = %e, "fatal error");
            eprintln!("slackbot: {e}");
            ExitCode::FAILURE
        }
    }
}
