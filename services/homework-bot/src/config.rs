//! Configuration types for the homework bot

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the review API OAuth token
pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the destination chat id
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub practicum: PracticumConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    /// Sent once on startup. `null` or empty disables the greeting.
    #[serde(default = "default_startup_message")]
    pub startup_message: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            practicum: PracticumConfig::default(),
            telegram: TelegramConfig::default(),
            polling: PollingConfig::default(),
            startup_message: default_startup_message(),
        }
    }
}

/// Review API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticumConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub token: String,
}

impl Default for PracticumConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: String::new(),
        }
    }
}

/// Telegram bot settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub chat_id: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: default_telegram_api_url(),
            token: String::new(),
            chat_id: String::new(),
        }
    }
}

/// Poll loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_retry_period")]
    pub retry_period_seconds: u64,
    /// Cursor for the first request. Defaults to the process start time.
    #[serde(default)]
    pub initial_from_date: Option<i64>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            retry_period_seconds: default_retry_period(),
            initial_from_date: None,
        }
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_period() -> u64 {
    600
}

fn default_startup_message() -> Option<String> {
    Some(
        "Привет, Я заступил в дежурство, с этого момента \
         я начинаю отслеживать все новые статусы домашних работ, \
         если что-нибудь появится, я обязательно тебе сообщу!"
            .to_string(),
    )
}

/// The three secrets the bot cannot run without
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub practicum_token: &'a str,
    pub telegram_token: &'a str,
    pub telegram_chat_id: &'a str,
}

impl std::fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("missing", &self.missing())
            .finish()
    }
}

impl Credentials<'_> {
    /// Names of the credentials that are empty or whitespace-only
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (PRACTICUM_TOKEN_VAR, self.practicum_token),
            (TELEGRAM_TOKEN_VAR, self.telegram_token),
            (TELEGRAM_CHAT_ID_VAR, self.telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Fail fast when any credential is absent.
    pub fn check_tokens(&self) -> crate::Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(crate::BotError::InvalidToken(missing))
        }
    }
}

impl Config {
    pub fn credentials(&self) -> Credentials<'_> {
        Credentials {
            practicum_token: &self.practicum.token,
            telegram_token: &self.telegram.token,
            telegram_chat_id: &self.telegram.chat_id,
        }
    }

    /// Fill credentials from the process environment. Non-empty variables
    /// take precedence over values from the config file.
    pub fn resolve_secrets(&mut self) {
        self.resolve_secrets_with(|name| std::env::var(name).ok());
    }

    pub fn resolve_secrets_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets = [
            (PRACTICUM_TOKEN_VAR, &mut self.practicum.token),
            (TELEGRAM_TOKEN_VAR, &mut self.telegram.token),
            (TELEGRAM_CHAT_ID_VAR, &mut self.telegram.chat_id),
        ];
        for (name, slot) in targets {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => {
                    tracing::debug!("Using {} from environment", name);
                    *slot = value;
                }
                _ => {}
            }
        }
    }
}

/// Load variables from a `.env` file into the process environment.
///
/// With no path, `.env` is searched for in the working directory and its
/// parents. Variables already set in the environment are left untouched.
/// A missing or unreadable file is not an error.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(path) => {
            tracing::debug!("Loaded environment from {:?}", path);
            Some(path)
        }
        Err(e) => {
            tracing::debug!("No .env file loaded: {}", e);
            None
        }
    }
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::BotError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content).map_err(|e| {
        crate::BotError::Config(format!("Failed to parse config file {:?}: {}", path, e))
    })?;
    Ok(config)
}
