use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::clients::{discord, github};

/// Application name, used for data and config directories
pub const APP_NAME: &str = "fx-status-checker";

/// Environment variable overriding `chatBotToken`
pub const CHAT_BOT_TOKEN_ENV: &str = "FX_STATUS_CHAT_BOT_TOKEN";

/// Environment variable overriding `workflowApiToken`
pub const WORKFLOW_API_TOKEN_ENV: &str = "FX_STATUS_WORKFLOW_API_TOKEN";

pub const DEFAULT_VANILLA_URL: &str = "https://territorial.io";
pub const DEFAULT_FX_URL: &str = "https://fxclient.github.io/FXclient/game.js";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Missing required config field: {0}")]
    MissingField(&'static str),
}

/// Monitor configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Channel holding the status board message
    pub status_channel_id: String,
    /// Message edited in place with the current status
    pub status_message_id: String,
    /// Channel receiving change notifications and alerts
    pub notification_channel_id: String,
    /// Base URL of the custom lobby server; `/version` is appended
    pub custom_lobby_base_url: Option<String>,
    pub chat_bot_token: String,
    pub workflow_api_token: String,
    pub sources: SourcesConfig,
    pub workflow: WorkflowConfig,
    pub api: ApiConfig,
    /// SQLite file for persisted state, defaults to [`db_path`]
    pub database_path: Option<PathBuf>,
}

/// Where the version-bearing source text is fetched from
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SourcesConfig {
    pub vanilla_url: String,
    pub fx_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            vanilla_url: DEFAULT_VANILLA_URL.to_string(),
            fx_url: DEFAULT_FX_URL.to_string(),
        }
    }
}

/// The rebuild-and-deploy workflow of the FX repository
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowConfig {
    pub owner: String,
    pub repo: String,
    pub workflow_id: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            owner: "fxclient".to_string(),
            repo: "FXclient".to_string(),
            workflow_id: "deploy.yml".to_string(),
            git_ref: "main".to_string(),
        }
    }
}

/// API endpoints, overridable for testing
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    pub discord_base_url: String,
    pub github_base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            discord_base_url: discord::DEFAULT_BASE_URL.to_string(),
            github_base_url: github::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load, apply env overrides and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_json(&content)?;
        config.apply_env_overrides(
            std::env::var(CHAT_BOT_TOKEN_ENV).ok(),
            std::env::var(WORKFLOW_API_TOKEN_ENV).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    fn apply_env_overrides(&mut self, chat_bot_token: Option<String>, workflow_token: Option<String>) {
        if let Some(token) = chat_bot_token.filter(|t| !t.is_empty()) {
            self.chat_bot_token = token;
        }
        if let Some(token) = workflow_token.filter(|t| !t.is_empty()) {
            self.workflow_api_token = token;
        }
    }

    /// Check that every required field is set
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("statusChannelId", &self.status_channel_id),
            ("statusMessageId", &self.status_message_id),
            ("notificationChannelId", &self.notification_channel_id),
            ("chatBotToken", &self.chat_bot_token),
            ("workflowApiToken", &self.workflow_api_token),
        ];

        match required.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(ConfigError::MissingField(name)),
            None => Ok(()),
        }
    }

    /// URL of the custom lobby version endpoint, if a lobby is configured
    pub fn custom_lobby_version_url(&self) -> Option<String> {
        self.custom_lobby_base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(|url| format!("{}/version", url.trim_end_matches('/')))
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(db_path)
    }
}

/// Returns the path to the data directory for fx-status-checker.
/// Uses $XDG_DATA_HOME/fx-status-checker if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/fx-status-checker,
/// or ./fx-status-checker if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the database file.
pub fn db_path() -> PathBuf {
    data_dir().join("state.db")
}

/// Returns the directory log files are written to.
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Returns the default config file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("config.json")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_NAME)
}
