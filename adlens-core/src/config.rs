//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/adlens/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/adlens/` (~/.config/adlens/)
//! - State/Logs: `$XDG_STATE_HOME/adlens/` (~/.local/state/adlens/)

use crate::error::{Error, Result};
use crate::filter::SpendRange;
use crate::types::AdType;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Listing filter defaults
    #[serde(default)]
    pub filter: FilterConfig,

    /// Analysis panel settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Chat assistant settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// Ad data source
    #[serde(default)]
    pub data: DataConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for the listing page filters
///
/// Unset spend bounds fall back to the ad type's own starting range: video listings
/// open at `[0, 10000]`, static listings at `[1300, 8300]`.
#[derive(Debug, Deserialize, Clone)]
pub struct FilterConfig {
    /// Lower bound of the spend range every listing starts with
    #[serde(default)]
    pub default_spend_min: Option<f64>,

    /// Upper bound of the spend range every listing starts with
    #[serde(default)]
    pub default_spend_max: Option<f64>,

    /// Largest value the spend slider offers
    #[serde(default = "default_max_spend")]
    pub max_spend: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            default_spend_min: None,
            default_spend_max: None,
            max_spend: default_max_spend(),
        }
    }
}

fn default_max_spend() -> f64 {
    50_000.0
}

impl FilterConfig {
    /// Spend range a listing of `ad_type` starts with.
    pub fn default_spend_range(&self, ad_type: AdType) -> Result<SpendRange> {
        let (min, max) = match ad_type {
            AdType::Video => (0.0, 10_000.0),
            AdType::Static => (1_300.0, 8_300.0),
        };
        SpendRange::new(
            self.default_spend_min.unwrap_or(min),
            self.default_spend_max.unwrap_or(max),
        )
    }

    /// The range "reset filters" opens: `[0, max_spend]`.
    pub fn full_spend_range(&self) -> Result<SpendRange> {
        SpendRange::new(0.0, self.max_spend)
    }
}

/// Analysis aggregation settings
#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Share of ads (by count) treated as top spenders for budget concentration
    #[serde(default = "default_top_spender_share")]
    pub top_spender_share: f64,

    /// Chart labels longer than this are truncated
    #[serde(default = "default_chart_name_max_chars")]
    pub chart_name_max_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_spender_share: default_top_spender_share(),
            chart_name_max_chars: default_chart_name_max_chars(),
        }
    }
}

fn default_top_spender_share() -> f64 {
    0.2
}

fn default_chart_name_max_chars() -> usize {
    20
}

/// Chat assistant settings
#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    /// Delay before a follow-up reply is delivered, in milliseconds
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: default_reply_delay_ms(),
        }
    }
}

fn default_reply_delay_ms() -> u64 {
    1500
}

/// Where ad data comes from
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DataConfig {
    /// Directory of `<account>/<video|static>.json` files; built-in seed data when unset
    pub dir: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate value ranges, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        let filter = &self.filter;
        for ad_type in [AdType::Video, AdType::Static] {
            if filter.default_spend_range(ad_type).is_err() {
                return Err(Error::Config(format!(
                    "filter.default_spend_min/default_spend_max give an invalid range for {} ads",
                    ad_type
                )));
            }
        }
        if !(filter.max_spend.is_finite() && filter.max_spend > 0.0) {
            return Err(Error::Config(
                "filter.max_spend must be a positive number".to_string(),
            ));
        }
        let share = self.analysis.top_spender_share;
        if !(share > 0.0 && share <= 1.0) {
            return Err(Error::Config(
                "analysis.top_spender_share must be in (0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/adlens/config.toml` (~/.config/adlens/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("adlens").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/adlens/` (~/.local/state/adlens/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("adlens")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.data.dir.is_none());
        assert_eq!(
            config.filter.default_spend_range(AdType::Video).unwrap(),
            SpendRange::new(0.0, 10_000.0).unwrap()
        );
        assert_eq!(
            config.filter.default_spend_range(AdType::Static).unwrap(),
            SpendRange::new(1_300.0, 8_300.0).unwrap()
        );
        assert_eq!(config.filter.max_spend, 50_000.0);
        assert_eq!(config.analysis.top_spender_share, 0.2);
        assert_eq!(config.analysis.chart_name_max_chars, 20);
        assert_eq!(config.chat.reply_delay_ms, 1500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[filter]
default_spend_min = 1300.0
default_spend_max = 8300.0

[chat]
reply_delay_ms = 0

[data]
dir = "/tmp/ads"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.filter.default_spend_min, Some(1300.0));
        assert_eq!(config.filter.default_spend_max, Some(8300.0));
        // explicit bounds apply to both ad types
        assert_eq!(
            config.filter.default_spend_range(AdType::Video).unwrap(),
            SpendRange::new(1_300.0, 8_300.0).unwrap()
        );
        assert_eq!(config.chat.reply_delay_ms, 0);
        assert_eq!(config.data.dir, Some(PathBuf::from("/tmp/ads")));
        assert_eq!(config.logging.level, "debug");
        // untouched sections keep defaults
        assert_eq!(config.analysis.chart_name_max_chars, 20);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.filter.default_spend_min = Some(500.0);
        config.filter.default_spend_max = Some(100.0);
        assert!(config.validate().is_err());

        // only the static range breaks: 9000 is above its 8300 default ceiling
        let mut config = Config::default();
        config.filter.default_spend_min = Some(9_000.0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.filter.max_spend = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.top_spender_share = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.top_spender_share = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_rejects_invalid_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[analysis]\ntop_spender_share = 2.0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
