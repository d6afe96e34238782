use std::path::PathBuf;

use clap::Parser;

/// slackbot: a Slack RTM bot that babbles back what it has overheard.
#[derive(Parser, Debug)]
#[command(name = "slackbot", version, about)]
pub struct Args {
    /// Slack bot token.
    #[arg(short, long, env = "SLACK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
