//! # mb-configs
//!
//! Layered application settings: `Modbot.toml` in the working directory,
//! overridden by `MODBOT_*` environment variables (e.g.
//! `MODBOT_MODERATION__MIN_POINTS=10`). Every field has a default so a
//! bare environment still produces a runnable bot.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

/// Thresholds for the moderation engine. Mirrors the engine's own config
/// but stays plain-serde here; the binary does the mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModerationSettings {
    pub points_for_timeout: i32,
    pub points_decay_per_second: f64,
    pub min_points: i32,
    pub timeout_duration_secs: i64,
}

impl Default for ModerationSettings {
    fn default() -> Self {
        Self {
            points_for_timeout: 100,
            points_decay_per_second: 0.0,
            min_points: 0,
            timeout_duration_secs: 120,
        }
    }
}

/// One banned-phrase pattern. `points: None` means an instant timeout.
#[derive(Debug, Clone, Deserialize)]
pub struct BannedPhraseSetting {
    pub pattern: String,
    #[serde(default)]
    pub points: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    pub banned_phrases: Vec<BannedPhraseSetting>,
    pub caps_min_letters: usize,
    pub caps_max_ratio: f64,
    pub caps_points: i32,
    pub max_message_chars: usize,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            banned_phrases: Vec::new(),
            caps_min_letters: 20,
            caps_max_ratio: 0.8,
            caps_points: 20,
            max_message_chars: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModLogSettings {
    pub database_url: String,
}

impl Default for ModLogSettings {
    fn default() -> Self {
        Self { database_url: "sqlite:modbot.db?mode=rwc".to_string() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub moderation: ModerationSettings,
    pub rules: RuleSettings,
    pub modlog: ModLogSettings,
}

impl Settings {
    /// Loads `Modbot.toml` (optional) and applies `MODBOT_*` overrides.
    pub fn load() -> Result<Self, SettingsError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name("Modbot").required(false))
            .add_source(
                config::Environment::with_prefix("MODBOT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let settings: Settings = cfg.try_deserialize()?;
        tracing::debug!(?settings, "settings loaded");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.moderation.points_for_timeout, 100);
        assert_eq!(settings.moderation.points_decay_per_second, 0.0);
        assert_eq!(settings.moderation.min_points, 0);
        assert_eq!(settings.moderation.timeout_duration_secs, 120);
        assert!(settings.rules.banned_phrases.is_empty());
    }

    #[test]
    fn empty_config_deserializes_to_defaults() {
        // Same deserialization path as `load`, but without the process
        // environment, so ambient MODBOT_* variables cannot leak in.
        let cfg = config::Config::builder().build().unwrap();
        let settings: Settings = cfg.try_deserialize().unwrap();
        assert_eq!(settings.moderation.points_for_timeout, 100);
        assert_eq!(settings.modlog.database_url, "sqlite:modbot.db?mode=rwc");
    }
}
