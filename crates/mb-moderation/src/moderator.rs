//! # Moderator
//!
//! Orchestrates rule evaluation for each incoming message, feeds the
//! per-user ledger, and escalates to timeouts once heat crosses the
//! configured cap.

use std::sync::Arc;

use dashmap::DashMap;
use mb_core::{Clock, Executor, Message, ModLogRepo, ModerationError, Result, Rule, RuleResult, User};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::ModerationConfig;
use crate::ledger::UserLedger;

/// The decision engine. One instance serves the whole bot; per-user ledger
/// entries are locked individually so unrelated users never serialize.
pub struct Moderator {
    rules: Vec<Box<dyn Rule>>,
    executor: Arc<dyn Executor>,
    mod_log: Arc<dyn ModLogRepo>,
    clock: Arc<dyn Clock>,
    config: ModerationConfig,
    ledgers: DashMap<String, Arc<Mutex<UserLedger>>>,
}

impl Moderator {
    /// Builds the engine, rejecting invalid configuration up front.
    pub fn new(
        rules: Vec<Box<dyn Rule>>,
        executor: Arc<dyn Executor>,
        mod_log: Arc<dyn ModLogRepo>,
        clock: Arc<dyn Clock>,
        config: ModerationConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self { rules, executor, mod_log, clock, config, ledgers: DashMap::new() })
    }

    /// Number of users with a ledger entry. Ledgers are created lazily on
    /// the first recorded violation and live for the process lifetime.
    pub fn tracked_users(&self) -> usize {
        self.ledgers.len()
    }

    /// Checks one message. Returns `Ok(true)` if the message is allowed,
    /// `Ok(false)` if it was acted upon (deleted, or its author timed out).
    ///
    /// Rules run in their configured order and the first non-trivial result
    /// wins; later rules are not consulted for this message. No ledger
    /// mutation happens before a rule result is obtained, so a caller
    /// cancelling mid-evaluation leaves no trace.
    pub async fn check(&self, message: &Message) -> Result<bool> {
        for rule in &self.rules {
            let result = rule.check(message).await.map_err(|source| {
                ModerationError::RuleEvaluation { rule: rule.id().to_owned(), source }
            })?;

            match result {
                RuleResult::Nothing => continue,
                RuleResult::DeleteMessage => {
                    info!(user = %message.author.name, rule = rule.id(), "deleting message");
                    self.executor.delete_message(message).await.map_err(|source| {
                        ModerationError::Action { action: "delete message".to_owned(), source }
                    })?;
                    return Ok(false);
                }
                RuleResult::Timeout { message: reason } => {
                    // Immediate timeout, ledger untouched.
                    info!(user = %message.author.name, rule = rule.id(), "rule demands timeout");
                    self.issue_timeout(&message.author, &reason).await?;
                    return Ok(false);
                }
                RuleResult::GivePoints { points, reason } => {
                    return self.give_points(&message.author, points, &reason, rule.id()).await;
                }
            }
        }
        Ok(true)
    }

    async fn give_points(
        &self,
        user: &User,
        points: i32,
        reason: &str,
        rule_id: &str,
    ) -> Result<bool> {
        if points < self.config.min_points {
            debug!(
                user = %user.name,
                rule = rule_id,
                points,
                min_points = self.config.min_points,
                "violation below minimum, ignored"
            );
            return Ok(true);
        }

        let now = self.clock.now();
        let ledger = {
            let entry = self
                .ledgers
                .entry(user.id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(UserLedger::new(now))));
            Arc::clone(entry.value())
        };

        // Per-user critical section: same-user checks serialize here,
        // different users proceed in parallel on their own entries.
        let mut ledger = ledger.lock().await;
        let heat = ledger.record_violation(points, reason, now, self.config.points_decay_per_second);
        debug!(user = %user.name, rule = rule_id, points, heat, "points recorded");

        if heat >= f64::from(self.config.points_for_timeout) {
            let composed = ledger.compose_reason();
            // Reset happens before the platform call and is not rolled back
            // if that call fails; a lost timeout beats a doubled one.
            ledger.reset();
            drop(ledger);

            self.issue_timeout(user, &composed).await?;
            return Ok(false);
        }

        Ok(true)
    }

    async fn issue_timeout(&self, user: &User, reason: &str) -> Result<()> {
        warn!(
            user = %user.name,
            reason,
            duration_secs = self.config.timeout_duration.num_seconds(),
            "issuing timeout"
        );
        self.executor
            .timeout_user(user, reason, self.config.timeout_duration)
            .await
            .map_err(|source| ModerationError::Action { action: "timeout user".to_owned(), source })?;
        self.mod_log
            .log_timeout(user, reason, self.clock.now())
            .await
            .map_err(|source| ModerationError::Action { action: "record mod log".to_owned(), source })?;
        Ok(())
    }
}
