//! Process configuration resolved from the environment.

use anyhow::Result;

pub const BOT_TOKEN_ENV: &str = "SLACK_BOT_TOKEN";
pub const TEAM_ID_ENV: &str = "SLACK_TEAM_ID";

const MISSING_TOKEN_HELP: &str = "\
SLACK_BOT_TOKEN environment variable is required

To use this MCP server:
1. Create a Slack app at https://api.slack.com/apps
2. Add OAuth scopes: channels:read, channels:history, groups:read, groups:history, users:read, search:read
3. Install the app to your workspace
4. Set SLACK_BOT_TOKEN environment variable to your Bot User OAuth Token
5. Optionally set SLACK_TEAM_ID for workspace info";

/// Runtime settings for the server process.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub team_id: Option<String>,
}

impl Config {
    /// Reads `SLACK_BOT_TOKEN` (required) and `SLACK_TEAM_ID` (optional).
    /// The error for a missing token carries setup guidance verbatim.
    pub fn from_env() -> Result<Self> {
        Self::from_values(
            std::env::var(BOT_TOKEN_ENV).ok(),
            std::env::var(TEAM_ID_ENV).ok(),
        )
    }

    fn from_values(bot_token: Option<String>, team_id: Option<String>) -> Result<Self> {
        let bot_token = bot_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| anyhow::anyhow!(MISSING_TOKEN_HELP))?;
        let team_id = team_id
            .map(|team| team.trim().to_string())
            .filter(|team| !team.is_empty());
        Ok(Self { bot_token, team_id })
    }
}
