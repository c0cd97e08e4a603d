use dotenv::dotenv;
use reqwest::Url;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5012";
pub const DEFAULT_LOG_FILE: &str = "latency-dashboard.log";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid LATENCY_API_URL {value:?}: {reason}")]
    InvalidApiUrl { value: String, reason: String },
    #[error("invalid POLL_INTERVAL_MS {0:?}: expected a positive number of milliseconds")]
    InvalidInterval(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: Url,
    pub poll_interval: Duration,
    pub log_file: PathBuf,
}

/// Loads `.env`, then reads the configuration from the environment.
pub fn init_app_config() -> Result<AppConfig, ConfigError> {
    dotenv().ok();
    config_from(|key| env::var(key).ok())
}

/// Builds the configuration from any key lookup; unset keys take their defaults.
pub fn config_from(lookup: impl Fn(&str) -> Option<String>) -> Result<AppConfig, ConfigError> {
    let raw_url = lookup("LATENCY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let api_url = parse_api_url(&raw_url)?;

    let poll_interval = match lookup("POLL_INTERVAL_MS") {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => Duration::from_millis(ms),
            _ => return Err(ConfigError::InvalidInterval(raw)),
        },
        None => Duration::from_millis(latency_core::POLL_INTERVAL_MS),
    };

    let log_file = lookup("LOG_FILE").map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from);

    Ok(AppConfig {
        api_url,
        poll_interval,
        log_file,
    })
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidApiUrl {
        value: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|error| invalid(error.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(invalid(format!("unsupported scheme {scheme}"))),
    }
}
