//! # mb-modlog-sqlite
//!
//! SQLite-backed implementation of `ModLogRepo`. Maps between the
//! relational audit table and the `mb-core` domain model.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mb_core::{ModLogEntry, ModLogRepo, User};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use uuid::Uuid;

// Helpers for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> anyhow::Result<Uuid> {
    Ok(Uuid::from_slice(blob)?)
}

pub struct SqliteModLogRepo {
    pool: SqlitePool,
}

impl SqliteModLogRepo {
    /// Connects and ensures the audit table exists.
    ///
    /// SQLite is a single-writer store, so the pool is capped at one
    /// connection; this also keeps `sqlite::memory:` databases coherent
    /// in tests.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new().max_connections(1).connect(url).await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS mod_log (
                id        BLOB PRIMARY KEY,
                user_id   TEXT NOT NULL,
                user_name TEXT NOT NULL,
                reason    TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                metadata  TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }

    /// Returns the most recent audit entries, newest first.
    pub async fn recent(&self, limit: i64) -> anyhow::Result<Vec<ModLogEntry>> {
        let rows = sqlx::query(
            "SELECT id, user_id, user_name, reason, timestamp, metadata
             FROM mod_log ORDER BY timestamp DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(ModLogEntry {
                    id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice())?,
                    user_id: row.get("user_id"),
                    user_name: row.get("user_name"),
                    reason: row.get("reason"),
                    timestamp: row.get("timestamp"),
                    metadata: serde_json::from_str(&row.get::<String, _>("metadata"))
                        .unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl ModLogRepo for SqliteModLogRepo {
    async fn log_timeout(
        &self,
        user: &User,
        reason: &str,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let entry = ModLogEntry::new(user, reason, timestamp);
        sqlx::query(
            "INSERT INTO mod_log (id, user_id, user_name, reason, timestamp, metadata)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(entry.id))
        .bind(entry.user_id)
        .bind(entry.user_name)
        .bind(entry.reason)
        .bind(entry.timestamp)
        .bind(serde_json::to_string(&entry.metadata)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn logs_and_reads_back_timeouts() {
        let repo = SqliteModLogRepo::new("sqlite::memory:").await.unwrap();
        let user = User::new("u-7", "Spammer");
        let t1 = Utc.timestamp_opt(1_000, 0).unwrap();
        let t2 = Utc.timestamp_opt(2_000, 0).unwrap();

        repo.log_timeout(&user, "spamming and caps", t1).await.unwrap();
        repo.log_timeout(&user, "links", t2).await.unwrap();

        let entries = repo.recent(10).await.unwrap();
        assert_eq!(entries.len(), 2);
        // Newest first
        assert_eq!(entries[0].reason, "links");
        assert_eq!(entries[0].timestamp, t2);
        assert_eq!(entries[1].reason, "spamming and caps");
        assert_eq!(entries[1].user_id, "u-7");
        assert_eq!(entries[1].user_name, "Spammer");
    }

    #[tokio::test]
    async fn corrupt_id_column_is_a_read_error() {
        let repo = SqliteModLogRepo::new("sqlite::memory:").await.unwrap();
        // A 3-byte blob is not a UUID; reading it back must fail loudly
        // instead of yielding the nil id.
        sqlx::query(
            "INSERT INTO mod_log (id, user_id, user_name, reason, timestamp, metadata)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(vec![0u8; 3])
        .bind("u-9")
        .bind("Chatter")
        .bind("spam")
        .bind(Utc.timestamp_opt(0, 0).unwrap())
        .bind("{}")
        .execute(&repo.pool)
        .await
        .unwrap();

        assert!(repo.recent(10).await.is_err());
    }

    #[tokio::test]
    async fn recent_respects_the_limit() {
        let repo = SqliteModLogRepo::new("sqlite::memory:").await.unwrap();
        let user = User::new("u-8", "Chatter");
        for i in 0..5 {
            let ts = Utc.timestamp_opt(i * 60, 0).unwrap();
            repo.log_timeout(&user, &format!("reason {i}"), ts).await.unwrap();
        }
        let entries = repo.recent(3).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].reason, "reason 4");
    }
}
