//! # ModerationError
//!
//! Centralized error handling for the Modbot ecosystem.
//! Maps moderation failures to actionable error types.

use thiserror::Error;

/// The primary error type surfaced by the moderation engine.
#[derive(Error, Debug)]
pub enum ModerationError {
    /// A rule failed to produce a result (e.g. its own external dependency
    /// errored). No fallback to later rules happens for that message.
    #[error("rule '{rule}' failed to evaluate")]
    RuleEvaluation {
        rule: String,
        #[source]
        source: anyhow::Error,
    },

    /// The Executor or ModLog call failed after a decision was reached.
    /// Ledger mutations already applied are not reverted.
    #[error("moderation action '{action}' failed")]
    Action {
        action: String,
        #[source]
        source: anyhow::Error,
    },

    /// Invalid construction-time configuration (e.g. negative thresholds).
    /// Rejected before any message is checked.
    #[error("invalid moderation configuration: {0}")]
    Configuration(String),
}

/// A specialized Result type for moderation logic.
pub type Result<T> = std::result::Result<T, ModerationError>;
