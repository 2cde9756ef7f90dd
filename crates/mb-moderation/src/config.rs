//! # Moderation Config
//!
//! Construction-time knobs for the engine. Validation happens once, when
//! the `Moderator` is built, never on the per-message hot path.

use chrono::Duration;
use mb_core::ModerationError;

/// Thresholds and rates controlling point accumulation and escalation.
#[derive(Debug, Clone)]
pub struct ModerationConfig {
    /// Heat level at which a timeout is issued. Compared with `>=`, so a
    /// total exactly equal to the cap escalates.
    pub points_for_timeout: i32,
    /// Points per second subtracted from heat due to elapsed time.
    pub points_decay_per_second: f64,
    /// Violations awarding fewer points than this are not recorded at all.
    pub min_points: i32,
    /// Duration handed to the executor for every issued timeout.
    pub timeout_duration: Duration,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            points_for_timeout: 100,
            points_decay_per_second: 0.0,
            min_points: 0,
            timeout_duration: Duration::minutes(2),
        }
    }
}

impl ModerationConfig {
    /// Rejects configurations that would make the engine misbehave.
    pub fn validate(&self) -> Result<(), ModerationError> {
        if self.points_for_timeout <= 0 {
            return Err(ModerationError::Configuration(format!(
                "points_for_timeout must be positive, got {}",
                self.points_for_timeout
            )));
        }
        if !self.points_decay_per_second.is_finite() || self.points_decay_per_second < 0.0 {
            return Err(ModerationError::Configuration(format!(
                "points_decay_per_second must be a non-negative finite number, got {}",
                self.points_decay_per_second
            )));
        }
        if self.min_points < 0 {
            return Err(ModerationError::Configuration(format!(
                "min_points must not be negative, got {}",
                self.min_points
            )));
        }
        if self.timeout_duration <= Duration::zero() {
            return Err(ModerationError::Configuration(format!(
                "timeout_duration must be positive, got {}s",
                self.timeout_duration.num_seconds()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ModerationConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_timeout_threshold() {
        let cfg = ModerationConfig { points_for_timeout: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ModerationError::Configuration(_))));

        let cfg = ModerationConfig { points_for_timeout: -5, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ModerationError::Configuration(_))));
    }

    #[test]
    fn rejects_negative_decay() {
        let cfg = ModerationConfig { points_decay_per_second: -1.0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ModerationError::Configuration(_))));
    }

    #[test]
    fn rejects_nan_decay() {
        let cfg = ModerationConfig { points_decay_per_second: f64::NAN, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ModerationError::Configuration(_))));
    }

    #[test]
    fn rejects_negative_min_points() {
        let cfg = ModerationConfig { min_points: -1, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ModerationError::Configuration(_))));
    }

    #[test]
    fn rejects_zero_timeout_duration() {
        let cfg = ModerationConfig { timeout_duration: Duration::zero(), ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ModerationError::Configuration(_))));
    }
}
