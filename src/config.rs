use std::time::Duration;
use thiserror::Error;

use crate::loader::DEFAULT_TIMEOUT;

/// Used when neither an argument nor `QUIZ_SOURCE_URL` names a source.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/usuario/repositorio/main/items.json";

pub const SOURCE_URL_VAR: &str = "QUIZ_SOURCE_URL";
pub const TIMEOUT_VAR: &str = "QUIZ_TIMEOUT_SECS";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(source_url: &str, timeout: Duration) -> Self {
        Self {
            source_url: source_url.to_string(),
            timeout,
        }
    }

    /// Loads `.env` if present, then resolves from `args` and the process
    /// environment.
    pub fn from_env(args: impl Iterator<Item = String>) -> Result<Self, ConfigError> {
        if let Ok(path) = dotenv::dotenv() {
            log::debug!("loaded environment from {}", path.display());
        }
        parse_config(args, |var| std::env::var(var).ok())
    }
}

/// First positional argument wins over `QUIZ_SOURCE_URL`, which wins over the
/// built-in default.
pub fn parse_config(
    mut args: impl Iterator<Item = String>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let non_empty = |url: &String| !url.trim().is_empty();
    let source_url = args
        .next()
        .filter(non_empty)
        .or_else(|| env(SOURCE_URL_VAR).filter(non_empty))
        .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string());

    let timeout = match env(TIMEOUT_VAR) {
        Some(value) => match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                return Err(ConfigError::InvalidTimeout {
                    var: TIMEOUT_VAR,
                    value,
                })
            }
        },
        None => DEFAULT_TIMEOUT,
    };

    Ok(Config::new(&source_url, timeout))
}
