use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::domain::repositories::dashboard_api::{
    DEFAULT_DECISIONS_LIMIT, DEFAULT_HISTORY_DAYS, DEFAULT_TRADES_LIMIT,
};
use crate::domain::services::metrics::REFERENCE_CAPITAL;

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Runtime configuration for the dashboard sync client
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    /// Backend origin; REST lives under `/api`, the push channel at `/ws`
    pub backend_url: Url,
    pub poll_interval: Duration,
    /// Flat delay between a push-channel close and the next attempt
    pub reconnect_delay: Duration,
    pub request_timeout: Duration,
    pub trades_limit: u32,
    pub history_days: u32,
    pub decisions_limit: u32,
    pub market_refresh_interval: Duration,
    pub team_refresh_interval: Duration,
    pub reference_capital: f64,
    pub preferences_path: PathBuf,
    /// Language requested through the environment; persisted on startup
    pub language_override: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend URL is valid"),
            poll_interval: Duration::from_secs(5),
            reconnect_delay: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            trades_limit: DEFAULT_TRADES_LIMIT,
            history_days: DEFAULT_HISTORY_DAYS,
            decisions_limit: DEFAULT_DECISIONS_LIMIT,
            market_refresh_interval: Duration::from_secs(10),
            team_refresh_interval: Duration::from_secs(30),
            reference_capital: REFERENCE_CAPITAL,
            preferences_path: PathBuf::from(".dashsync/preferences.json"),
            language_override: None,
        }
    }
}

impl DashboardConfig {
    pub fn with_backend_url(mut self, url: Url) -> Self {
        self.backend_url = url;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> DashboardConfig {
        let mut config = DashboardConfig::default();

        if let Ok(raw) = std::env::var("DASHBOARD_BACKEND_URL") {
            match Url::parse(&raw) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => config.backend_url = url,
                Ok(url) => warn!(
                    "DASHBOARD_BACKEND_URL must be http or https, got '{}', using default",
                    url.scheme()
                ),
                Err(e) => warn!("Invalid DASHBOARD_BACKEND_URL '{}': {}, using default", raw, e),
            }
        }

        if let Some(secs) = read_positive_u64("DASHBOARD_POLL_INTERVAL_SECS") {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = read_positive_u64("DASHBOARD_RECONNECT_DELAY_SECS") {
            config.reconnect_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = read_positive_u64("DASHBOARD_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Ok(raw) = std::env::var("DASHBOARD_REFERENCE_CAPITAL") {
            match raw.parse::<f64>() {
                Ok(value) if value.is_finite() && value > 0.0 => config.reference_capital = value,
                Ok(value) => warn!(
                    "DASHBOARD_REFERENCE_CAPITAL must be positive, got {}, using default {}",
                    value, config.reference_capital
                ),
                Err(e) => warn!("Invalid DASHBOARD_REFERENCE_CAPITAL '{}': {}", raw, e),
            }
        }

        if let Ok(path) = std::env::var("DASHBOARD_PREFS_PATH") {
            if !path.trim().is_empty() {
                config.preferences_path = PathBuf::from(path);
            }
        }

        if let Ok(lang) = std::env::var("DASHBOARD_LANGUAGE") {
            if !lang.trim().is_empty() {
                config.language_override = Some(lang.trim().to_string());
            }
        }

        config
    }
}

fn read_positive_u64(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        Ok(_) => {
            warn!("{} must be greater than zero, using default", key);
            None
        }
        Err(e) => {
            warn!("Invalid {} '{}': {}, using default", key, raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard_cadence() {
        let config = DashboardConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.reconnect_delay, Duration::from_secs(5));
        assert_eq!(config.trades_limit, 50);
        assert_eq!(config.history_days, 30);
        assert_eq!(config.decisions_limit, 20);
        assert_eq!(config.market_refresh_interval, Duration::from_secs(10));
        assert_eq!(config.team_refresh_interval, Duration::from_secs(30));
        assert_eq!(config.reference_capital, 175.0);
    }

    #[test]
    fn test_from_env_overrides_and_rejects() {
        // Single test touching the environment so parallel tests do not race.
        std::env::set_var("DASHBOARD_BACKEND_URL", "https://desk.example.com:8443");
        std::env::set_var("DASHBOARD_POLL_INTERVAL_SECS", "2");
        std::env::set_var("DASHBOARD_RECONNECT_DELAY_SECS", "0");
        std::env::set_var("DASHBOARD_REFERENCE_CAPITAL", "-5");
        std::env::set_var("DASHBOARD_LANGUAGE", " en ");

        let config = DashboardConfig::from_env();
        assert_eq!(config.backend_url.as_str(), "https://desk.example.com:8443/");
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.reconnect_delay, Duration::from_secs(5));
        assert_eq!(config.reference_capital, 175.0);
        assert_eq!(config.language_override.as_deref(), Some("en"));

        std::env::set_var("DASHBOARD_BACKEND_URL", "ftp://desk.example.com");
        assert_eq!(DashboardConfig::from_env().backend_url.as_str(), "http://127.0.0.1:8000/");

        for key in [
            "DASHBOARD_BACKEND_URL",
            "DASHBOARD_POLL_INTERVAL_SECS",
            "DASHBOARD_RECONNECT_DELAY_SECS",
            "DASHBOARD_REFERENCE_CAPITAL",
            "DASHBOARD_LANGUAGE",
        ] {
            std::env::remove_var(key);
        }
    }
}
