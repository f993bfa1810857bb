//! Turn Router - the per-turn routing state machine.
//!
//! For each inbound turn the router decides whether to classify, dispatch,
//! clarify, or halt. The structural guard against Router → handler → Router
//! re-entry is the halting rule: once the most recent turn was produced by
//! the agent, `route` returns `Halt` unconditionally and idempotently.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::foundation::StateMachine;
use crate::ports::IntentClassifier;

use super::dispatch::handler_for;
use super::intent::{HandlerId, Intent, IntentResult};
use super::state::{ConversationState, TurnRole};

/// Outcome of one routing pass over the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// No new user turn to act on; stop processing.
    Halt,
    /// Dispatch to the handler resolved for the current intent.
    Dispatch(HandlerId),
    /// Intent unclear; ask a clarification question.
    Clarify,
}

/// Processing phase of one inbound turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterPhase {
    Idle,
    Classifying,
    Dispatched,
    Clarifying,
    Halted,
}

impl StateMachine for RouterPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use RouterPhase::*;
        matches!(
            (self, target),
            (Idle, Classifying)
                | (Idle, Halted)
                | (Classifying, Dispatched)
                | (Classifying, Clarifying)
                | (Classifying, Halted)
                | (Dispatched, Idle)
                | (Clarifying, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use RouterPhase::*;
        match self {
            Idle => vec![Classifying, Halted],
            Classifying => vec![Dispatched, Clarifying, Halted],
            Dispatched => vec![Idle],
            Clarifying => vec![Idle],
            Halted => vec![],
        }
    }
}

/// The per-turn routing state machine.
///
/// Holds no lock of its own: turn safety derives from confining each
/// session's state mutation to a single turn's execution.
pub struct TurnRouter {
    classifier: Arc<dyn IntentClassifier>,
    confidence_threshold: f32,
    history_window: usize,
}

impl TurnRouter {
    /// Creates a router over a classifier port.
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        confidence_threshold: f32,
        history_window: usize,
    ) -> Self {
        Self {
            classifier,
            confidence_threshold,
            history_window,
        }
    }

    /// Decides the next step from the current state.
    ///
    /// Halting rule: when the most recent turn is absent or was produced by
    /// the agent there is no new user input, so the decision is `Halt` —
    /// calling again on the same state returns `Halt` again.
    pub fn route(&self, state: &ConversationState) -> RouteDecision {
        match state.last_turn() {
            None => {
                debug!(session_id = %state.session_id, "no turns yet, halting");
                RouteDecision::Halt
            }
            Some(turn) if turn.role == TurnRole::Agent => {
                debug!(
                    session_id = %state.session_id,
                    "last turn is from the agent, no new user input, halting"
                );
                RouteDecision::Halt
            }
            Some(_) => match state.current_intent {
                None | Some(Intent::Unclear) => RouteDecision::Clarify,
                Some(_) => match state.current_handler {
                    Some(handler) => RouteDecision::Dispatch(handler),
                    None => RouteDecision::Clarify,
                },
            },
        }
    }

    /// Classifies the latest user turn and folds the result into the state.
    ///
    /// Never fails: a classifier-adapter error degrades to `Unclear` with
    /// `need_reroute = false`, since `Unclear` always has a defined
    /// clarification path.
    pub async fn classify_and_update(&self, state: &mut ConversationState) {
        let query = match state.latest_user_query() {
            Some(q) => q.to_string(),
            None => {
                debug!(session_id = %state.session_id, "no user query to classify");
                return;
            }
        };

        let history = state.history_window(self.history_window);
        let current_intent = state.current_intent;

        match self
            .classifier
            .classify(&query, history.as_deref(), current_intent)
            .await
        {
            Ok(result) => {
                info!(
                    session_id = %state.session_id,
                    intent = %result.intent,
                    confidence = result.confidence,
                    needs_clarification = result.needs_clarification,
                    "intent classified"
                );
                self.apply_classification(state, result);
            }
            Err(e) => {
                warn!(
                    session_id = %state.session_id,
                    error = %e,
                    "classification failed, degrading to unclear"
                );
                state.current_intent = Some(Intent::Unclear);
                state.sub_intent = None;
                state.current_handler = None;
                state.need_reroute = false;
                state.touch();
            }
        }
    }

    /// Pure state update for one classification result.
    ///
    /// Below the confidence threshold the intent is forced to `Unclear` and
    /// the handler cleared regardless of what the classifier reported.
    pub fn apply_classification(&self, state: &mut ConversationState, result: IntentResult) {
        if result.confidence < self.confidence_threshold {
            info!(
                session_id = %state.session_id,
                confidence = result.confidence,
                threshold = self.confidence_threshold,
                "confidence below threshold, clarification needed"
            );
            state.current_intent = Some(Intent::Unclear);
            state.sub_intent = None;
            state.current_handler = None;
            state.need_reroute = false;
        } else {
            let previous = state.current_intent;
            let need_reroute = previous != Some(result.intent);
            if need_reroute {
                info!(
                    session_id = %state.session_id,
                    previous = %previous.map(|i| i.as_str()).unwrap_or("none"),
                    new = %result.intent,
                    "intent change detected"
                );
            }

            state.current_handler = handler_for(result.intent, result.sub_intent);
            state.current_intent = Some(result.intent);
            state.sub_intent = if result.intent == Intent::Diagnosis {
                result.sub_intent
            } else {
                None
            };
            state.need_reroute = need_reroute;
        }
        state.touch();
    }

    /// Produces the clarification reply for an unclear turn.
    pub async fn clarify(&self, state: &ConversationState) -> String {
        let query = state.latest_user_query().unwrap_or_default();
        self.classifier.clarify(query).await
    }
}
