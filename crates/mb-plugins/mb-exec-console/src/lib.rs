//! # mb-exec-console
//!
//! Dry-run adapters: an `Executor` that only logs what it would do, and an
//! in-memory `ModLogRepo`. Useful for local runs and as lightweight test
//! doubles when a full mock is overkill.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mb_core::{Executor, Message, ModLogEntry, ModLogRepo, User};
use tokio::sync::Mutex;

/// Executor that carries out nothing and logs everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleExecutor;

#[async_trait]
impl Executor for ConsoleExecutor {
    async fn delete_message(&self, message: &Message) -> anyhow::Result<()> {
        tracing::info!(
            user = %message.author.name,
            text = %message.text,
            "would delete message"
        );
        Ok(())
    }

    async fn timeout_user(
        &self,
        user: &User,
        reason: &str,
        duration: Duration,
    ) -> anyhow::Result<()> {
        tracing::info!(
            user = %user.name,
            reason,
            duration_secs = duration.num_seconds(),
            "would timeout user"
        );
        Ok(())
    }
}

/// ModLogRepo keeping entries in memory, oldest first.
#[derive(Debug, Default)]
pub struct InMemoryModLogRepo {
    entries: Mutex<Vec<ModLogEntry>>,
}

impl InMemoryModLogRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<ModLogEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl ModLogRepo for InMemoryModLogRepo {
    async fn log_timeout(
        &self,
        user: &User,
        reason: &str,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        self.entries.lock().await.push(ModLogEntry::new(user, reason, timestamp));
        Ok(())
    }
}
