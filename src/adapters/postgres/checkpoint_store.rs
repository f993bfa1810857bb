//! PostgreSQL implementation of CheckpointStore.
//!
//! Runs on the autocommit pool. Each save inserts a new version row on top
//! of the session's latest one in a single statement, so the write is
//! atomic and versions are append-after-previous per session. Loads return
//! the newest version.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::foundation::SessionId;
use crate::domain::routing::ConversationState;
use crate::ports::{CheckpointError, CheckpointStore};

/// PostgreSQL implementation of CheckpointStore.
#[derive(Clone)]
pub struct PostgresCheckpointStore {
    pool: PgPool,
}

impl PostgresCheckpointStore {
    /// Creates a store over the autocommit pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Latest checkpoint version for a session, if any. Exposed for
    /// integration tests of the append-after-previous property.
    pub async fn latest_version(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<i64>, CheckpointError> {
        let version: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT MAX(version) FROM conversation_checkpoints
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CheckpointError::DatabaseError(format!("Failed to read version: {}", e)))?;

        Ok(version)
    }
}

#[async_trait]
impl CheckpointStore for PostgresCheckpointStore {
    async fn load_state(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<ConversationState>, CheckpointError> {
        let row = sqlx::query(
            r#"
            SELECT state FROM conversation_checkpoints
            WHERE session_id = $1
            ORDER BY version DESC
            LIMIT 1
            "#,
        )
        .bind(session_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CheckpointError::DatabaseError(format!("Failed to load state: {}", e)))?;

        match row {
            Some(row) => {
                let Json(state): Json<ConversationState> = row.try_get("state").map_err(|e| {
                    CheckpointError::DeserializationFailed(format!(
                        "Stored state is not valid: {}",
                        e
                    ))
                })?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn save_state(&self, state: &ConversationState) -> Result<(), CheckpointError> {
        // Single statement under autocommit: the version bump and the state
        // write land together or not at all.
        sqlx::query(
            r#"
            INSERT INTO conversation_checkpoints (session_id, user_id, version, state)
            VALUES (
                $1,
                $2,
                (SELECT COALESCE(MAX(version), 0) + 1
                   FROM conversation_checkpoints
                  WHERE session_id = $1),
                $3
            )
            "#,
        )
        .bind(state.session_id.as_str())
        .bind(state.user_id.as_str())
        .bind(Json(state))
        .execute(&self.pool)
        .await
        .map_err(|e| CheckpointError::DatabaseError(format!("Failed to save state: {}", e)))?;

        Ok(())
    }
}
