//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# slackbot configuration
# Only override what you want to change -- missing fields use defaults.

[slack]
# api_base = "https://slack.com/api"
# token = "xoxb-..."     # prefer --token or SLACK_TOKEN

[session]
# ping_interval_secs = 20     # 1-300
# connect_timeout_secs = 15   # 1-120
# greet_channel = "C01234567" # post one generated message on connect

[reply]
# target = "same_channel"     # same_channel, fixed
# channel = "C01234567"       # required when target = "fixed"
# ignore_own_messages = true

[model]
# max_generation_steps = 500  # 0 = unbounded

[logging]
# level = "info"              # trace, debug, info, warn, error
"##
}
