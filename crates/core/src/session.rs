//! Session domain types.
//!
//! A session tracks one conversation: its append-only message history and
//! the most recent plan/notes handed back to the user. Sessions are owned by
//! the session store and mutated only by the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::topic::PlanStep;

/// The role of a message sender in a session history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The assistant reply
    Assistant,
}

/// A single entry in a session's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// Per-conversation state. History is append-only; a `handle_message` call
/// appends its user and assistant entries adjacently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub history: Vec<HistoryEntry>,
    pub last_plan: Option<Vec<PlanStep>>,
    pub last_notes: Option<String>,
}

impl Session {
    /// Create a fresh session, generating an id when none is supplied.
    pub fn new(id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            created_at: now,
            updated_at: now,
            history: Vec::new(),
            last_plan: None,
            last_notes: None,
        }
    }

    /// Append a history entry and bump `updated_at`.
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        let now = Utc::now();
        self.history.push(HistoryEntry {
            role,
            content: content.into(),
            at: now,
        });
        self.updated_at = now;
    }
}
