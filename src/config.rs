//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development. The completion API key is
//! optional at startup: without it the estimate and analyze routes fail per
//! call with a configuration error while the ledger keeps working.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
const DEFAULT_APP_NAME: &str = "CarbonCal";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Directory holding the ledger records
    pub data_dir: PathBuf,
    /// Development mode: adapter failures include diagnostic details
    pub development: bool,
    /// Completion service settings
    pub completion: CompletionConfig,
}

/// Settings for the external completion service.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Sent as `HTTP-Referer` for attribution
    pub site_url: Option<String>,
    /// Sent as `X-Title`
    pub app_name: String,
    /// Per-request timeout. `None` waits as long as the service does.
    pub timeout: Option<Duration>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            site_url: None,
            app_name: DEFAULT_APP_NAME.to_string(),
            timeout: None,
        }
    }
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            frontend_url: "http://localhost:5173".to_string(),
            data_dir: PathBuf::from("data"),
            development: false,
            completion: CompletionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout = match non_empty("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.parse().map_err(|_| {
                ConfigError::Invalid {
                    var: "UPSTREAM_TIMEOUT_SECS",
                    value: raw.clone(),
                }
            })?)),
            None => None,
        };

        let development = non_empty("APP_ENV")
            .or_else(|| non_empty("NODE_ENV"))
            .is_some_and(|v| v.eq_ignore_ascii_case("development"));

        Ok(Self {
            port: non_empty("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            frontend_url: non_empty("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            data_dir: non_empty("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            development,
            completion: CompletionConfig {
                api_key: non_empty("OPENROUTER_API_KEY"),
                base_url: non_empty("OPENROUTER_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: non_empty("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                site_url: non_empty("OPENROUTER_SITE_URL"),
                app_name: non_empty("OPENROUTER_APP_NAME")
                    .unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
                timeout,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}
