//! # Domain Models
//!
//! These structs represent the core entities flowing through the moderation
//! pipeline. Messages are immutable once constructed; everything mutable
//! lives inside the moderation engine itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat participant, identified by a stable platform id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct User {
    /// Stable platform-assigned id (survives display name changes)
    pub id: String,
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// Where a message came from. Whispers are moderated with the same rules
/// but the channel matters to executors and audit logs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageSource {
    Chat,
    Whisper,
}

/// A single incoming chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub author: User,
    pub text: String,
    pub source: MessageSource,
    /// Opaque correlation id (e.g. the platform's message tag), needed by
    /// executors to delete the right message.
    pub detail: String,
}

impl Message {
    pub fn new(
        author: User,
        text: impl Into<String>,
        source: MessageSource,
        detail: impl Into<String>,
    ) -> Self {
        Self { author, text: text.into(), source, detail: detail.into() }
    }
}

/// The outcome of checking one message against one rule.
///
/// Exactly four cases, mutually exclusive. The moderation engine
/// short-circuits at the first result that is not `Nothing`.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleResult {
    /// No action; message allowed, no state change.
    Nothing,
    /// Message is removed; no point or ledger effect.
    DeleteMessage,
    /// Message allowed for now, but points are recorded against the author.
    GivePoints { points: i32, reason: String },
    /// Immediate timeout; bypasses the point ledger entirely.
    Timeout { message: String },
}

/// One audit record of an issued timeout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModLogEntry {
    pub id: Uuid,
    pub user_id: String,
    pub user_name: String,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    /// Metadata bucket for adapters (e.g. platform response ids)
    pub metadata: serde_json::Value,
}

impl ModLogEntry {
    pub fn new(user: &User, reason: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            reason: reason.into(),
            timestamp,
            metadata: serde_json::json!({}),
        }
    }
}
