//! Clinician assistant agent (placeholder).
//!
//! The records/prescriptions assistant for clinicians is not live yet; the
//! handler exists so the intent has a defined dispatch target.

use async_trait::async_trait;

use crate::domain::routing::{ConversationState, HandlerId};

use super::{HandlerError, TurnHandler};

/// Placeholder handler for the clinician assistant intent.
#[derive(Default)]
pub struct DoctorAssistantHandler;

impl DoctorAssistantHandler {
    /// Creates the handler.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TurnHandler for DoctorAssistantHandler {
    fn id(&self) -> HandlerId {
        HandlerId::DoctorAssistantAgent
    }

    async fn handle(&self, _state: &ConversationState) -> Result<String, HandlerError> {
        Ok(
            "The clinician assistant (records, prescriptions, patient queries) is still under \
             development. For now I can help with blood pressure tracking, follow-up \
             appointments, and symptom questions."
                .to_string(),
        )
    }
}
