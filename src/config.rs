use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

use crate::format::{self, DEFAULT_DISPLAY_TZ};
use crate::home::HomeMode;

const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub poll_interval: Duration,
    pub home_mode: HomeMode,
    pub upcoming_days: u32,
    pub display_tz: Tz,
    pub http_timeout_secs: u64,
    pub fetch_parallelism: usize,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Reads `.env.local` and `.env` (when present) and then the process
    /// environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };

        let api_url = get("GOALS_API_URL")
            .or_else(|| get("NEXT_PUBLIC_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let poll_secs = get("GOALS_POLL_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(30)
            .max(5);
        let home_mode = get("GOALS_HOME_MODE")
            .and_then(|val| HomeMode::parse(&val))
            .unwrap_or(HomeMode::Hybrid);
        let upcoming_days = get("GOALS_UPCOMING_DAYS")
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(7)
            .clamp(1, 14);
        let display_tz = get("GOALS_DISPLAY_TZ")
            .and_then(|val| format::parse_display_tz(&val))
            .unwrap_or(DEFAULT_DISPLAY_TZ);
        let http_timeout_secs = get("GOALS_HTTP_TIMEOUT_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(10)
            .clamp(1, 120);
        let fetch_parallelism = get("GOALS_FETCH_PARALLELISM")
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(4)
            .clamp(1, 16);
        let log_file = get("GOALS_LOG_FILE").map(PathBuf::from);

        Self {
            api_url,
            poll_interval: Duration::from_secs(poll_secs),
            home_mode,
            upcoming_days,
            display_tz,
            http_timeout_secs,
            fetch_parallelism,
            log_file,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_the_web_front_end() {
        let cfg = Config::default();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.home_mode, HomeMode::Hybrid);
        assert_eq!(cfg.upcoming_days, 7);
        assert_eq!(cfg.display_tz, chrono_tz::Asia::Bahrain);
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn public_api_url_is_a_fallback() {
        let cfg = config_with(&[("NEXT_PUBLIC_API_URL", "https://api.example.test")]);
        assert_eq!(cfg.api_url, "https://api.example.test");

        let cfg = config_with(&[
            ("NEXT_PUBLIC_API_URL", "https://api.example.test"),
            ("GOALS_API_URL", "http://127.0.0.1:9000"),
        ]);
        assert_eq!(cfg.api_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn numeric_settings_are_clamped_and_bad_values_ignored() {
        let cfg = config_with(&[
            ("GOALS_POLL_SECS", "1"),
            ("GOALS_UPCOMING_DAYS", "90"),
            ("GOALS_DISPLAY_TZ", "Mars/Olympus"),
            ("GOALS_HOME_MODE", "date"),
            ("GOALS_FETCH_PARALLELISM", "zero"),
        ]);
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.upcoming_days, 14);
        assert_eq!(cfg.display_tz, chrono_tz::Asia::Bahrain);
        assert_eq!(cfg.home_mode, HomeMode::DateWindow);
        assert_eq!(cfg.fetch_parallelism, 4);
    }
}
