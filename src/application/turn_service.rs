//! Turn service - drives one inbound turn end to end.
//!
//! Load state → route (iteration-capped) → classify → dispatch or clarify →
//! append the reply → persist. The state is mutated in memory only and
//! written once at the turn boundary, so a cancelled turn never leaves a
//! partially updated checkpoint. Each inbound turn performs at most one
//! classification and at most one dispatch; the iteration cap backs up the
//! halting rule as defense-in-depth.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::foundation::{SessionId, StateMachine, UserId, ValidationError};
use crate::domain::routing::{
    ConversationState, HandlerId, Intent, RouteDecision, RouterPhase, Turn, TurnRouter,
};
use crate::ports::{CheckpointError, CheckpointStore};

use super::handlers::HandlerRegistry;

/// Reply used when a handler fails or cannot be resolved. Internal error
/// detail never reaches the conversational surface.
pub const GENERIC_FAILURE_REPLY: &str = "I'm sorry, something went wrong while handling your \
request. Please try again in a moment.";

/// Errors that abort a turn. Handler and classifier failures are recovered
/// inside the turn and never appear here.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("checkpoint failure: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("router phase violation: {0}")]
    Phase(#[from] ValidationError),
}

/// Outcome of one processed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub current_intent: Option<Intent>,
    pub current_handler: Option<HandlerId>,
    pub need_reroute: bool,
}

/// Processes inbound turns for all sessions.
///
/// Holds no per-session lock: turns for different sessions run in
/// independent tasks, and within one session each turn exclusively owns
/// its state between load and save.
pub struct TurnService {
    router: TurnRouter,
    checkpoints: Arc<dyn CheckpointStore>,
    handlers: HandlerRegistry,
    max_route_iterations: u32,
}

impl TurnService {
    /// Creates the service.
    pub fn new(
        router: TurnRouter,
        checkpoints: Arc<dyn CheckpointStore>,
        handlers: HandlerRegistry,
        max_route_iterations: u32,
    ) -> Self {
        Self {
            router,
            checkpoints,
            handlers,
            max_route_iterations,
        }
    }

    /// Processes one inbound user turn and returns the agent's reply.
    #[instrument(
        skip_all,
        fields(session_id = %session_id, trace_id = %Uuid::new_v4())
    )]
    pub async fn process_turn(
        &self,
        session_id: SessionId,
        user_id: UserId,
        message: &str,
    ) -> Result<TurnOutcome, TurnError> {
        let mut state = match self.checkpoints.load_state(&session_id).await? {
            Some(state) => {
                if state.user_id != user_id {
                    warn!(
                        stored = %state.user_id,
                        supplied = %user_id,
                        "user id differs from session owner, keeping stored owner"
                    );
                }
                state
            }
            None => {
                info!("starting new session");
                ConversationState::new(session_id, user_id)
            }
        };

        state.push_turn(Turn::user(message));

        let mut phase = RouterPhase::Idle;
        let mut iterations = 0u32;
        while iterations < self.max_route_iterations {
            iterations += 1;

            if self.router.route(&state) == RouteDecision::Halt {
                phase = phase.transition_to(RouterPhase::Halted)?;
                break;
            }

            phase = phase.transition_to(RouterPhase::Classifying)?;
            self.router.classify_and_update(&mut state).await;

            match self.router.route(&state) {
                RouteDecision::Halt => {
                    phase = phase.transition_to(RouterPhase::Halted)?;
                    break;
                }
                RouteDecision::Dispatch(handler_id) => {
                    phase = phase.transition_to(RouterPhase::Dispatched)?;
                    let reply = self.dispatch(handler_id, &state).await;
                    state.push_turn(Turn::agent(reply));
                    phase = phase.transition_to(RouterPhase::Idle)?;
                }
                RouteDecision::Clarify => {
                    phase = phase.transition_to(RouterPhase::Clarifying)?;
                    let reply = self.router.clarify(&state).await;
                    state.push_turn(Turn::agent(reply));
                    phase = phase.transition_to(RouterPhase::Idle)?;
                }
            }
        }

        if phase != RouterPhase::Halted {
            warn!(
                cap = self.max_route_iterations,
                "route iteration cap reached before halt"
            );
        }

        // Single all-or-nothing write at the turn boundary.
        self.checkpoints.save_state(&state).await?;

        let reply = state
            .latest_agent_reply()
            .unwrap_or(GENERIC_FAILURE_REPLY)
            .to_string();

        info!(
            intent = state.current_intent.map(|i| i.as_str()).unwrap_or("none"),
            handler = state
                .current_handler
                .map(|h| h.as_str())
                .unwrap_or("none"),
            need_reroute = state.need_reroute,
            "turn completed"
        );

        Ok(TurnOutcome {
            reply,
            current_intent: state.current_intent,
            current_handler: state.current_handler,
            need_reroute: state.need_reroute,
        })
    }

    /// Runs the resolved handler; any failure is recovered into the
    /// generic user-facing message with the detail kept in the logs.
    async fn dispatch(&self, handler_id: HandlerId, state: &ConversationState) -> String {
        match self.handlers.resolve(handler_id) {
            Some(handler) => match handler.handle(state).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!(
                        handler = %handler_id,
                        error = %e,
                        "handler dispatch failed"
                    );
                    GENERIC_FAILURE_REPLY.to_string()
                }
            },
            None => {
                error!(handler = %handler_id, "no handler registered");
                GENERIC_FAILURE_REPLY.to_string()
            }
        }
    }
}
