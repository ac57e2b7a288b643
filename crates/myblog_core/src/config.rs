//! Client configuration from environment variables.
//!
//! # Invariants
//! - `api_base_url` is an absolute http(s) URL without a trailing slash.
//! - `data_dir` is absolute so log and store paths are stable.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const API_BASE_URL_ENV: &str = "MYBLOG_API_BASE_URL";
pub const DATA_DIR_ENV: &str = "MYBLOG_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "MYBLOG_LOG_LEVEL";
pub const REQUEST_TIMEOUT_ENV: &str = "MYBLOG_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DATA_DIR_NAME: &str = ".myblog";
const SESSION_DB_FILE_NAME: &str = "session.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBaseUrl { value: String, reason: String },
    InvalidTimeout(String),
    InvalidLogLevel(String),
    NoDataDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBaseUrl { value, reason } => {
                write!(f, "invalid API base URL `{value}`: {reason}")
            }
            Self::InvalidTimeout(value) => {
                write!(f, "invalid request timeout `{value}`; expected whole seconds > 0")
            }
            Self::InvalidLogLevel(value) => write!(f, "invalid log level `{value}`"),
            Self::NoDataDir => write!(f, "cannot determine an absolute data directory"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub log_level: &'static str,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_base_url = parse_base_url(
            non_empty(API_BASE_URL_ENV)
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL),
        )?;

        let data_dir = match non_empty(DATA_DIR_ENV) {
            Some(dir) => absolute_dir(Path::new(dir.trim()))?,
            None => default_data_dir(non_empty("HOME"))?,
        };

        let log_level = match non_empty(LOG_LEVEL_ENV) {
            Some(level) => {
                normalize_level(&level).map_err(|_| ConfigError::InvalidLogLevel(level.clone()))?
            }
            None => default_log_level(),
        };

        let request_timeout = match non_empty(REQUEST_TIMEOUT_ENV) {
            Some(value) => parse_timeout(&value)?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            api_base_url,
            data_dir,
            log_level,
            request_timeout,
        })
    }

    pub fn with_api_base_url(mut self, value: &str) -> Result<Self, ConfigError> {
        self.api_base_url = parse_base_url(value)?;
        Ok(self)
    }

    pub fn with_data_dir(mut self, dir: &Path) -> Result<Self, ConfigError> {
        self.data_dir = absolute_dir(dir)?;
        Ok(self)
    }

    pub fn with_log_level(mut self, level: &str) -> Result<Self, ConfigError> {
        self.log_level =
            normalize_level(level).map_err(|_| ConfigError::InvalidLogLevel(level.to_string()))?;
        Ok(self)
    }

    pub fn session_db_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

/// Validates an http(s) base URL and trims trailing slashes.
pub fn parse_base_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        value: trimmed.to_string(),
        reason,
    };
    let url = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(value.to_string())),
    }
}

fn absolute_dir(dir: &Path) -> Result<PathBuf, ConfigError> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(dir))
        .map_err(|_| ConfigError::NoDataDir)
}

fn default_data_dir(home: Option<String>) -> Result<PathBuf, ConfigError> {
    match home {
        Some(home) if Path::new(&home).is_absolute() => Ok(Path::new(&home).join(DATA_DIR_NAME)),
        _ => absolute_dir(Path::new(DATA_DIR_NAME)),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_base_url, ClientConfig, ConfigError, DEFAULT_REQUEST_TIMEOUT};
    use std::collections::HashMap;
    use std::path::Path;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = ClientConfig::from_lookup(lookup(&[("HOME", "/home/ann")])).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.data_dir, Path::new("/home/ann/.myblog"));
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(
            config.session_db_path(),
            Path::new("/home/ann/.myblog/session.sqlite3")
        );
        assert_eq!(config.log_dir(), Path::new("/home/ann/.myblog/logs"));
    }

    #[test]
    fn environment_overrides_are_validated() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("MYBLOG_API_BASE_URL", "https://blog.example.com/api/"),
            ("MYBLOG_DATA_DIR", "/var/lib/myblog"),
            ("MYBLOG_LOG_LEVEL", "WARN"),
            ("MYBLOG_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://blog.example.com/api");
        assert_eq!(config.data_dir, Path::new("/var/lib/myblog"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        let err = ClientConfig::from_lookup(lookup(&[("MYBLOG_REQUEST_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("0".to_string()));
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(parse_base_url("ftp://example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("http://example.com/api?x=1").is_err());
        assert_eq!(
            parse_base_url(" http://example.com/ ").unwrap(),
            "http://example.com"
        );
    }
}
