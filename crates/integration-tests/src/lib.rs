//! Shared fixtures for the moderation integration tests: a hand-advanced
//! clock and the point-awarding test rule used by the ledger scenarios.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mb_core::{Clock, Message, MessageSource, Rule, RuleResult, User};

/// Test clock whose value is advanced by hand between checks.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn at(secs: i64) -> Arc<Self> {
        Arc::new(Self(Mutex::new(Utc.timestamp_opt(secs, 0).unwrap())))
    }

    pub fn set(&self, secs: i64) {
        *self.0.lock().unwrap() = Utc.timestamp_opt(secs, 0).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Awards a fixed number of points on every check, with a rolling counter
/// in the reason so composed justification strings can be asserted.
pub struct GivePointsRule {
    points: i32,
    rolling: AtomicI32,
}

impl GivePointsRule {
    pub fn new(points: i32) -> Self {
        Self { points, rolling: AtomicI32::new(1) }
    }
}

#[async_trait]
impl Rule for GivePointsRule {
    fn id(&self) -> &str {
        "test-give-points"
    }

    async fn check(&self, _message: &Message) -> anyhow::Result<RuleResult> {
        let n = self.rolling.fetch_add(1, Ordering::SeqCst);
        Ok(RuleResult::GivePoints {
            points: self.points,
            reason: format!("points for testing #{n}"),
        })
    }
}

pub fn mock_user(name: &str) -> User {
    User::new(name.to_lowercase(), name)
}

pub fn chat_message(user: &User, text: &str) -> Message {
    Message::new(user.clone(), text, MessageSource::Chat, "")
}
