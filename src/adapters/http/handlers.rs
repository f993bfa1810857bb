//! HTTP handlers for the chat and health endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use tracing::{error, info};

use crate::adapters::db::HealthStatus;
use crate::application::AppContext;
use crate::domain::foundation::{SessionId, UserId};

use super::dto::{ChatRequest, ChatResponse, ErrorResponse};

/// API error mapped to an HTTP response. Internal detail stays in the
/// logs; the body carries only a generic message.
pub enum ApiError {
    BadRequest(String),
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            ),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// `POST /api/chat` - one conversational turn.
pub async fn chat(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let session_id =
        SessionId::new(request.session_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let user_id = UserId::new(request.user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message cannot be empty".to_string()));
    }

    info!(session_id = %session_id, "chat turn received");

    let outcome = ctx
        .turn_service
        .process_turn(session_id, user_id, &request.message)
        .await
        .map_err(|e| {
            error!(error = %e, "turn processing failed");
            ApiError::Internal
        })?;

    Ok(Json(ChatResponse {
        response: outcome.reply,
        current_intent: outcome
            .current_intent
            .map(|i| i.as_str().to_string())
            .unwrap_or_else(|| "unclear".to_string()),
        current_agent: outcome.current_handler.map(|h| h.as_str().to_string()),
    }))
}

/// `GET /api/health` - dual-pool health surface.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Response {
    let report = ctx.health().await;
    let status = match report.status {
        HealthStatus::Error => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    (status, Json(report)).into_response()
}
