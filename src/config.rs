use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::session::{DEFAULT_HISTORY_LIMIT, DEFAULT_SESSION_TIMEOUT};

/// Interaction tokens stop accepting edits after 15 minutes, so a showcase
/// cannot outlive this.
pub const MAX_SESSION_TIMEOUT_SECS: u64 = 900;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub bot: BotConfig,
    #[serde(default)]
    pub showcase: ShowcaseConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub commands: HashMap<String, CommandConfig>,
}

#[derive(Debug, Deserialize)]
pub struct BotConfig {
    pub token: String,
    /// Register slash commands on this guild only; global when unset.
    #[serde(default)]
    pub guild_id: Option<u64>,
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    #[serde(default = "default_rate_limit_commands")]
    pub rate_limit_commands: usize,
    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_secs: u64,
}

fn default_command_prefix() -> String {
    "!".to_string()
}

fn default_rate_limit_commands() -> usize {
    5
}

fn default_rate_limit_window() -> u64 {
    60
}

#[derive(Debug, Deserialize)]
pub struct ShowcaseConfig {
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_recent_actions")]
    pub recent_actions: usize,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            session_timeout_secs: default_session_timeout(),
            history_limit: default_history_limit(),
            recent_actions: default_recent_actions(),
        }
    }
}

impl ShowcaseConfig {
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }
}

fn default_session_timeout() -> u64 {
    DEFAULT_SESSION_TIMEOUT.as_secs()
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_recent_actions() -> usize {
    5
}

#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base")]
    pub base_url: String,
    #[serde(default = "default_cdn_base")]
    pub cdn_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
            cdn_url: default_cdn_base(),
        }
    }
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_cdn_base() -> String {
    "https://cdn.discordapp.com".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CommandConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let config: Config = toml::from_str(content)?;
        if config.showcase.session_timeout_secs > MAX_SESSION_TIMEOUT_SECS {
            return Err(format!(
                "showcase.session_timeout_secs is {}, must be at most {}",
                config.showcase.session_timeout_secs, MAX_SESSION_TIMEOUT_SECS
            )
            .into());
        }
        Ok(config)
    }

    /// Commands without a `[commands.<name>]` table are enabled.
    pub fn is_command_enabled(&self, name: &str) -> bool {
        self.commands.get(name).map(|c| c.enabled).unwrap_or(true)
    }
}
