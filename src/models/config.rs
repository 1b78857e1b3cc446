// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Polling behavior settings
    #[serde(default)]
    pub poller: PollerConfig,

    /// HTTP fetch settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Judge-specific standings markup hooks
    #[serde(default)]
    pub standings: StandingsSelectors,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.poller.interval_secs == 0 {
            return Err(AppError::validation("poller.interval_secs must be > 0"));
        }
        if self.poller.contest_url.trim().is_empty() {
            return Err(AppError::validation("poller.contest_url is empty"));
        }
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.standings.table_selector.trim().is_empty() {
            return Err(AppError::validation("standings.table_selector is empty"));
        }
        if self.standings.team_selector.trim().is_empty() {
            return Err(AppError::validation("standings.team_selector is empty"));
        }
        if self.standings.label_selector.trim().is_empty() {
            return Err(AppError::validation("standings.label_selector is empty"));
        }
        Ok(())
    }
}

/// Periodic polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Seconds between scheduled cycles
    #[serde(default = "defaults::interval_secs")]
    pub interval_secs: u64,

    /// URL of the judge's live standings page
    #[serde(default)]
    pub contest_url: String,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval_secs(),
            contest_url: String::new(),
        }
    }
}

/// HTTP client settings for standings fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// CSS hooks into the judge's standings markup.
///
/// The supported judge renders one standings table whose header cells carry
/// the problem letters and whose body cells mark acceptances with a small
/// label element. These selectors name those hooks; the positional cell
/// offset lives in the parser as a documented constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsSelectors {
    /// Selector for the standings table
    #[serde(default = "defaults::table_selector")]
    pub table_selector: String,

    /// Selector for the team-name container inside a body row
    #[serde(default = "defaults::team_selector")]
    pub team_selector: String,

    /// Selector for the accepted-submission label inside a problem cell
    #[serde(default = "defaults::label_selector")]
    pub label_selector: String,
}

impl Default for StandingsSelectors {
    fn default() -> Self {
        Self {
            table_selector: defaults::table_selector(),
            team_selector: defaults::team_selector(),
            label_selector: defaults::label_selector(),
        }
    }
}

mod defaults {
    // Poller defaults
    pub fn interval_secs() -> u64 {
        60
    }

    // Fetcher defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; balloontrack/0.1)".into()
    }
    pub fn timeout() -> u64 {
        15
    }

    // Standings markup defaults for the supported judge
    pub fn table_selector() -> String {
        "table".into()
    }
    pub fn team_selector() -> String {
        ".team-name".into()
    }
    pub fn label_selector() -> String {
        ".label".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.poller.contest_url = "https://judge.example.com/contest/1".into();
        config
    }

    #[test]
    fn validate_accepts_config_with_contest_url() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_contest_url() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let mut config = valid_config();
        config.poller.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_selector() {
        let mut config = valid_config();
        config.standings.team_selector = " ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [poller]
            contest_url = "https://judge.example.com/contest/1"
            "#,
        )
        .unwrap();
        assert_eq!(config.poller.interval_secs, 60);
        assert_eq!(config.fetcher.timeout_secs, 15);
        assert_eq!(config.standings.table_selector, "table");
    }
}
