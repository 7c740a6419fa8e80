//! Configuration module for teamclock.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::timezone::{ClockStyle, LocalZone};

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding teammates.json, groups.json and settings.json
    pub data_dir: PathBuf,
    /// Viewer zone override; `None` uses the system zone
    pub local_zone: Option<String>,
    /// 12h or 24h time-of-day rendering
    pub clock_style: ClockStyle,
    /// How often `watch` re-renders the board
    pub refresh_interval: Duration,
    /// Quiet period before an interactive zone lookup runs
    pub lookup_debounce: Duration,
    /// Maximum number of zone lookup results
    pub lookup_limit: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let data_dir = env::var("TEAMCLOCK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let local_zone = env::var("TEAMCLOCK_LOCAL_TZ")
            .ok()
            .filter(|zone| !zone.trim().is_empty());

        let clock_style = env::var("TEAMCLOCK_CLOCK")
            .ok()
            .and_then(|style| style.parse().ok())
            .unwrap_or_default();

        let refresh_interval = Duration::from_secs(env_number("TEAMCLOCK_REFRESH_SECS", 60));
        let lookup_debounce =
            Duration::from_millis(env_number("TEAMCLOCK_LOOKUP_DEBOUNCE_MS", 300));
        let lookup_limit = env_number("TEAMCLOCK_LOOKUP_LIMIT", 20) as usize;

        let log_level = env::var("TEAMCLOCK_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        let log_format = match env::var("TEAMCLOCK_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            data_dir,
            local_zone,
            clock_style,
            refresh_interval,
            lookup_debounce,
            lookup_limit,
            log_level,
            log_format,
        }
    }

    /// Resolve the configured viewer zone.
    ///
    /// An unknown override is logged and replaced by the system zone.
    pub fn viewer_zone(&self) -> LocalZone {
        match &self.local_zone {
            Some(name) => LocalZone::named(name).unwrap_or_else(|| {
                tracing::warn!("Unknown TEAMCLOCK_LOCAL_TZ {:?}, using system zone", name);
                LocalZone::System
            }),
            None => LocalZone::System,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("teamclock"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

fn env_number(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("TEAMCLOCK_DATA_DIR");
        env::remove_var("TEAMCLOCK_LOCAL_TZ");
        env::remove_var("TEAMCLOCK_CLOCK");
        env::remove_var("TEAMCLOCK_REFRESH_SECS");
        env::remove_var("TEAMCLOCK_LOOKUP_DEBOUNCE_MS");
        env::remove_var("TEAMCLOCK_LOOKUP_LIMIT");
        env::remove_var("TEAMCLOCK_LOG_LEVEL");
        env::remove_var("TEAMCLOCK_LOG_FORMAT");

        let config = Config::from_env();

        assert!(config.data_dir.ends_with("teamclock") || config.data_dir.ends_with("data"));
        assert!(config.local_zone.is_none());
        assert_eq!(config.clock_style, ClockStyle::TwelveHour);
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.lookup_debounce, Duration::from_millis(300));
        assert_eq!(config.lookup_limit, 20);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.viewer_zone(), LocalZone::System);
    }
}
