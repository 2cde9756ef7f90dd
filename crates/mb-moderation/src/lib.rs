//! # mb-moderation
//!
//! The decision core of Modbot: rule sequencing, the per-user decaying
//! point ledger, and escalation to timeouts.
//!
//! Everything platform-specific (rule content, chat actions, audit
//! persistence) lives behind the `mb-core` ports; this crate only decides.

pub mod config;
pub mod ledger;
pub mod moderator;

pub use config::ModerationConfig;
pub use ledger::UserLedger;
pub use moderator::Moderator;
