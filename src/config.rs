//! Runtime settings.
//!
//! Sources, lowest priority first: an optional TOML file, `LADDER_*`
//! environment variables, then `DISCORD_BOT_TOKEN` for the token.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Ledger file location.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Chat command prefix.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub discord_token: Option<String>,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_prefix() -> String {
    "!".to_string()
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("LADDER"))
            .set_override_option("discord_token", std::env::var("DISCORD_BOT_TOKEN").ok())?
            .build()?
            .try_deserialize()
    }

    /// The bot token; required only when connecting to Discord.
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.discord_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ConfigError::NotFound("discord_token".to_string()))
    }
}
