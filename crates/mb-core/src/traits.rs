//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the moderation
//! engine. They are injected at construction time, never reached through
//! globals, so tests can substitute every collaborator.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::models::{Message, RuleResult, User};

/// A pluggable detector that inspects a message and yields at most one
/// actionable outcome.
///
/// A rule may keep private interior-mutable state (rolling counters etc.)
/// but must never touch the shared point ledger.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait Rule: Send + Sync {
    /// Stable identifier, used in logs and error reports.
    fn id(&self) -> &str;

    async fn check(&self, message: &Message) -> anyhow::Result<RuleResult>;
}

/// Carries out moderation actions against the live chat platform.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait Executor: Send + Sync {
    async fn delete_message(&self, message: &Message) -> anyhow::Result<()>;

    async fn timeout_user(
        &self,
        user: &User,
        reason: &str,
        duration: Duration,
    ) -> anyhow::Result<()>;
}

/// Audit sink for issued timeouts.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait ModLogRepo: Send + Sync {
    async fn log_timeout(
        &self,
        user: &User,
        reason: &str,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<()>;
}

/// Time source, injected so decay arithmetic is deterministic in tests.
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
