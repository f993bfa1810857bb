//! Conversation state and turns.
//!
//! `ConversationState` is exclusively owned by the router while a turn is
//! being processed and persisted to the checkpoint store at turn
//! boundaries, keyed by session id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, UserId};

use super::intent::{DiagnosisDepartment, HandlerId, Intent};

/// Role of a turn's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Agent,
}

/// One message in a session. Immutable once appended; ordering within a
/// session is total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    /// Creates an agent turn.
    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Agent,
            content: content.into(),
        }
    }
}

/// Complete routing state of one conversation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub turns: Vec<Turn>,
    pub current_intent: Option<Intent>,
    pub sub_intent: Option<DiagnosisDepartment>,
    pub current_handler: Option<HandlerId>,
    /// Observability flag: set when a confident classification changed the
    /// intent. Does not gate any branching.
    pub need_reroute: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    /// Creates an empty state for a new session.
    pub fn new(session_id: SessionId, user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            user_id,
            turns: Vec::new(),
            current_intent: None,
            sub_intent: None,
            current_handler: None,
            need_reroute: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a turn. Turns are never edited or removed afterwards.
    pub fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.touch();
    }

    /// The most recent turn, if any.
    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Content of the most recent turn when it came from the user.
    pub fn latest_user_query(&self) -> Option<&str> {
        match self.last_turn() {
            Some(turn) if turn.role == TurnRole::User => Some(&turn.content),
            _ => None,
        }
    }

    /// Content of the most recent agent turn, if any.
    pub fn latest_agent_reply(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == TurnRole::Agent)
            .map(|t| t.content.as_str())
    }

    /// Formats the last `window` turns as classifier context.
    ///
    /// Returns `None` when the session has no turns yet.
    pub fn history_window(&self, window: usize) -> Option<String> {
        if self.turns.is_empty() {
            return None;
        }
        let start = self.turns.len().saturating_sub(window);
        let lines: Vec<String> = self.turns[start..]
            .iter()
            .map(|turn| match turn.role {
                TurnRole::User => format!("User: {}", turn.content),
                TurnRole::Agent => format!("Assistant: {}", turn.content),
            })
            .collect();
        Some(lines.join("\n"))
    }

    /// Refreshes the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
