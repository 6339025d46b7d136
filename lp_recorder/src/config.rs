//! Recorder configuration from environment variables and CLI flags.

use live_poker::export::{DEFAULT_API_URL, DEFAULT_TIMEOUT, ExportSettings};
use std::{str::FromStr, time::Duration};
use thiserror::Error;

/// Delay between a fold being recorded and the player leaving the hand.
pub const DEFAULT_FOLD_DELAY: Duration = Duration::from_millis(800);

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Values given on the command line. They win over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub fold_delay_ms: Option<u64>,
    pub table_name: Option<String>,
}

/// Recorder configuration
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Hand server base URL (default: http://localhost:5005/api)
    pub api_url: String,

    /// Bearer token for the hand server
    pub api_token: Option<String>,

    /// Save request timeout (default: 10s)
    pub timeout: Duration,

    /// Pause before a fold is finalized (default: 800ms)
    pub fold_delay: Duration,

    /// Document header fields
    pub export: ExportSettings,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            timeout: DEFAULT_TIMEOUT,
            fold_delay: DEFAULT_FOLD_DELAY,
            export: ExportSettings::default(),
        }
    }
}

impl RecorderConfig {
    /// Load configuration from the process environment.
    ///
    /// Reads (all optional):
    /// - `LP_API_URL`, `LP_API_TOKEN`, `LP_API_TIMEOUT_SECS`
    /// - `LP_FOLD_DELAY_MS`
    /// - `LP_SITE_NAME`, `LP_NETWORK_NAME`, `LP_TABLE_NAME`, `LP_CURRENCY`,
    ///   `LP_HERO_ID`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a variable doesn't parse or the
    /// result fails [`RecorderConfig::validate`].
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Same as [`RecorderConfig::from_env`] with a custom variable source.
    ///
    /// # Errors
    ///
    /// See [`RecorderConfig::from_env`].
    pub fn from_lookup<F>(lookup: F, overrides: Overrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| lookup(key).unwrap_or(default);

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => parse_or(&lookup, "LP_API_TIMEOUT_SECS", defaults.timeout.as_secs())?,
        };
        let fold_delay_ms = match overrides.fold_delay_ms {
            Some(ms) => ms,
            None => parse_or(
                &lookup,
                "LP_FOLD_DELAY_MS",
                u64::try_from(defaults.fold_delay.as_millis()).unwrap_or(u64::MAX),
            )?,
        };

        let export = ExportSettings {
            site_name: text("LP_SITE_NAME", defaults.export.site_name),
            network_name: text("LP_NETWORK_NAME", defaults.export.network_name),
            table_name: overrides
                .table_name
                .unwrap_or_else(|| text("LP_TABLE_NAME", defaults.export.table_name)),
            currency: text("LP_CURRENCY", defaults.export.currency),
            hero_player_id: parse_or(&lookup, "LP_HERO_ID", defaults.export.hero_player_id)?,
        };

        let config = Self {
            api_url: overrides
                .api_url
                .unwrap_or_else(|| text("LP_API_URL", defaults.api_url)),
            api_token: overrides
                .api_token
                .or_else(|| lookup("LP_API_TOKEN"))
                .filter(|token| !token.trim().is_empty()),
            timeout: Duration::from_secs(timeout_secs),
            fold_delay: Duration::from_millis(fold_delay_ms),
            export,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the loaded values make sense together.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending variable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "LP_API_URL".to_string(),
                reason: format!("'{}' must start with http:// or https://", self.api_url),
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: "LP_API_TIMEOUT_SECS".to_string(),
                reason: "must be at least 1 second".to_string(),
            });
        }
        if self.export.hero_player_id == 0 {
            return Err(ConfigError::Invalid {
                var: "LP_HERO_ID".to_string(),
                reason: "player ids start at 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Parse a variable, falling back to `default` when it's unset.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("'{value}': {err}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)], overrides: Overrides) -> Result<RecorderConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RecorderConfig::from_lookup(|key| vars.get(key).cloned(), overrides)
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = load(&[], Overrides::default()).unwrap();
        assert_eq!(config.api_url, "http://localhost:5005/api");
        assert_eq!(config.api_token, None);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.fold_delay, Duration::from_millis(800));
        assert_eq!(config.export, ExportSettings::default());
    }

    #[test]
    fn test_environment_values() {
        let config = load(
            &[
                ("LP_API_URL", "https://hands.example.com/api"),
                ("LP_API_TOKEN", "abc123"),
                ("LP_API_TIMEOUT_SECS", "30"),
                ("LP_FOLD_DELAY_MS", "0"),
                ("LP_SITE_NAME", "Bellagio"),
                ("LP_TABLE_NAME", "Table 12"),
                ("LP_CURRENCY", "EUR"),
                ("LP_HERO_ID", "4"),
            ],
            Overrides::default(),
        )
        .unwrap();
        assert_eq!(config.api_url, "https://hands.example.com/api");
        assert_eq!(config.api_token.as_deref(), Some("abc123"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.fold_delay.is_zero());
        assert_eq!(config.export.site_name, "Bellagio");
        assert_eq!(config.export.network_name, "Live Game");
        assert_eq!(config.export.table_name, "Table 12");
        assert_eq!(config.export.currency, "EUR");
        assert_eq!(config.export.hero_player_id, 4);
    }

    #[test]
    fn test_overrides_win_over_environment() {
        let config = load(
            &[
                ("LP_API_URL", "http://env:1/api"),
                ("LP_FOLD_DELAY_MS", "500"),
                ("LP_TABLE_NAME", "env table"),
            ],
            Overrides {
                api_url: Some("http://flag:2/api".to_string()),
                fold_delay_ms: Some(50),
                table_name: Some("flag table".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(config.api_url, "http://flag:2/api");
        assert_eq!(config.fold_delay, Duration::from_millis(50));
        assert_eq!(config.export.table_name, "flag table");
    }

    #[test]
    fn test_blank_token_treated_as_missing() {
        let config = load(&[("LP_API_TOKEN", "  ")], Overrides::default()).unwrap();
        assert_eq!(config.api_token, None);
    }

    #[test]
    fn test_unparseable_number_names_variable() {
        let err = load(&[("LP_FOLD_DELAY_MS", "soon")], Overrides::default()).unwrap_err();
        let ConfigError::Invalid { var, .. } = err;
        assert_eq!(var, "LP_FOLD_DELAY_MS");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        for (key, value) in [
            ("LP_API_URL", "localhost:5005"),
            ("LP_API_TIMEOUT_SECS", "0"),
            ("LP_HERO_ID", "0"),
        ] {
            let ConfigError::Invalid { var, .. } =
                load(&[(key, value)], Overrides::default()).unwrap_err();
            assert_eq!(var, key);
        }
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::Invalid {
            var: "LP_HERO_ID".to_string(),
            reason: "player ids start at 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for LP_HERO_ID: player ids start at 1"
        );
    }
}
