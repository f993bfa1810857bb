//! Checkpoint Store Port - Interface for persisting conversation state.
//!
//! State is saved once per turn at the turn boundary, keyed by session id,
//! with append-after-previous semantics per session: each save produces a
//! new version on top of the last one, and a save is all-or-nothing.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::SessionId;
use crate::domain::routing::ConversationState;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Failed to serialize state: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize state: {0}")]
    DeserializationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Port for persisting and loading per-session conversation state
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Load the latest conversation state for a session.
    ///
    /// Returns `Ok(None)` for a session with no checkpoints yet.
    async fn load_state(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<ConversationState>, CheckpointError>;

    /// Persist conversation state as a new version for its session.
    ///
    /// The write is atomic: either the full state becomes the newest
    /// version or nothing is recorded.
    async fn save_state(&self, state: &ConversationState) -> Result<(), CheckpointError>;
}
