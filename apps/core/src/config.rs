//! Runtime configuration read from the environment and an optional `.env` file.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;
use validator::Validate;

use crate::error::AppError;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MIN_DELAY_MS: u64 = 1500;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_LOG_FILTER: &str = "info";
const DATABASE_FILE: &str = "consulting24.sqlite";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("unknown log format: {other}"))),
        }
    }
}

/// Connection settings for the hosted model. Only exists when an API key is set.
#[derive(Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: Url,
    pub temperature: f32,
    pub timeout: Duration,
}

impl fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Clone, Validate)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    #[validate(length(min = 1))]
    pub gemini_model: String,
    pub gemini_base_url: Url,
    #[validate(range(min = 0.0, max = 2.0))]
    pub gemini_temperature: f32,
    #[validate(range(min = 1, max = 600))]
    pub gemini_timeout_secs: u64,
    #[validate(range(max = 60000))]
    pub min_delay_ms: u64,
    pub data_dir: PathBuf,
    pub log_format: LogFormat,
    pub log_filter: String,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url.as_str())
            .field("gemini_temperature", &self.gemini_temperature)
            .field("gemini_timeout_secs", &self.gemini_timeout_secs)
            .field("min_delay_ms", &self.min_delay_ms)
            .field("data_dir", &self.data_dir)
            .field("log_format", &self.log_format)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unset and blank values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            gemini_api_key: get("GEMINI_API_KEY").map(|v| v.trim().to_string()),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: Url::parse(
                get("GEMINI_BASE_URL").as_deref().unwrap_or(DEFAULT_BASE_URL).trim(),
            )?,
            gemini_temperature: parse_or(
                "GEMINI_TEMPERATURE",
                get("GEMINI_TEMPERATURE"),
                DEFAULT_TEMPERATURE,
            )?,
            gemini_timeout_secs: parse_or(
                "GEMINI_TIMEOUT_SECS",
                get("GEMINI_TIMEOUT_SECS"),
                DEFAULT_TIMEOUT_SECS,
            )?,
            min_delay_ms: parse_or(
                "CONSULTING24_MIN_DELAY_MS",
                get("CONSULTING24_MIN_DELAY_MS"),
                DEFAULT_MIN_DELAY_MS,
            )?,
            data_dir: PathBuf::from(
                get("CONSULTING24_DATA_DIR")
                    .as_deref()
                    .unwrap_or(DEFAULT_DATA_DIR),
            ),
            log_format: match get("CONSULTING24_LOG_FORMAT") {
                Some(raw) => raw.parse()?,
                None => LogFormat::default(),
            },
            log_filter: get("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Settings for the model client, or `None` in fallback-only mode.
    pub fn gemini(&self) -> Option<GeminiSettings> {
        self.gemini_api_key.as_ref().map(|api_key| GeminiSettings {
            api_key: api_key.clone(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
            temperature: self.gemini_temperature,
            timeout: Duration::from_secs(self.gemini_timeout_secs),
        })
    }

    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, AppError>
where
    T::Err: fmt::Display,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key}: {e}"))),
        None => Ok(default),
    }
}
