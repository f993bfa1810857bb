//! HTTP request/response data transfer objects.

use serde::{Deserialize, Serialize};

/// Inbound chat turn.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// User message content
    pub message: String,
    /// Session identifier (checkpoint thread key)
    pub session_id: String,
    /// User identifier
    pub user_id: String,
}

/// Agent reply for one turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// Agent reply content
    pub response: String,
    /// Current intent after this turn
    pub current_intent: String,
    /// Currently active agent handler, if any
    pub current_agent: Option<String>,
}

/// Error body for failed requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
