use crate::constants::{env as env_keys, network};
use crate::services::logger::LogLevel;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Process-wide settings, resolved once at startup and handed to every
/// service that needs them.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_host: String,
    pub api_version: String,
    pub cyberfraud_token: Option<String>,
    pub code_defender_token: Option<String>,
    pub http_timeout_ms: u64,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_host: network::DEFAULT_API_HOST.to_string(),
            api_version: network::DEFAULT_API_VERSION.to_string(),
            cyberfraud_token: None,
            code_defender_token: None,
            http_timeout_ms: network::TIMEOUT_API_REQUEST_MS,
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();
        let config = Self {
            api_host: non_blank(env_keys::API_HOST).unwrap_or(defaults.api_host),
            api_version: non_blank(env_keys::API_VERSION).unwrap_or(defaults.api_version),
            cyberfraud_token: non_blank(env_keys::CYBERFRAUD_TOKEN),
            code_defender_token: non_blank(env_keys::CODE_DEFENDER_TOKEN),
            http_timeout_ms: non_blank(env_keys::HTTP_TIMEOUT_MS)
                .and_then(|v| parse_timeout_ms(&v))
                .unwrap_or(defaults.http_timeout_ms),
            log_level: non_blank(env_keys::LOG_LEVEL)
                .map(|v| LogLevel::parse(&v))
                .unwrap_or(defaults.log_level),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        if timeout_ms > 0 {
            self.http_timeout_ms = timeout_ms;
        }
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api_base();
        Url::parse(&base).map_err(|err| ConfigError::InvalidBaseUrl {
            url: base.clone(),
            reason: err.to_string(),
        })?;
        Ok(())
    }

    pub fn api_base(&self) -> String {
        format!(
            "https://{}/{}",
            self.api_host.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }

    pub fn cyberfraud_base(&self) -> String {
        format!("{}/cyberfraud", self.api_base())
    }

    pub fn code_defender_base(&self) -> String {
        format!("{}/code-defender", self.api_base())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

fn parse_timeout_ms(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|v| *v > 0)
}
