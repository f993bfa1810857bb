//! Department diagnosis agents.
//!
//! One handler instance per department, registered under the department's
//! dedicated handler id. Replies are deterministic triage guidance; the
//! knowledge-base retrieval behind richer answers lives outside this
//! service.

use async_trait::async_trait;

use crate::domain::routing::{
    department_handler, ConversationState, DiagnosisDepartment, HandlerId,
};

use super::{HandlerError, TurnHandler};

/// Triage guidance handler for one department.
pub struct DiagnosisHandler {
    department: DiagnosisDepartment,
}

impl DiagnosisHandler {
    /// Creates the handler for a department.
    pub fn new(department: DiagnosisDepartment) -> Self {
        Self { department }
    }

    fn department_advice(&self) -> &'static str {
        match self.department {
            DiagnosisDepartment::Cardiology => {
                "Chest pain, palpitations, or breathlessness on exertion deserve prompt \
                 attention; if symptoms are severe or sudden, seek emergency care immediately."
            }
            DiagnosisDepartment::Pediatrics => {
                "For children, keep track of temperature, fluid intake, and energy levels; \
                 persistent high fever or lethargy warrants a same-day visit."
            }
            DiagnosisDepartment::Gynecology => {
                "Note the timing and pattern of your symptoms relative to your cycle; sudden \
                 severe pain or heavy bleeding warrants urgent review."
            }
            DiagnosisDepartment::Surgery => {
                "Swelling, persistent localized pain, or a wound that isn't healing should be \
                 examined in person before deciding on any procedure."
            }
            DiagnosisDepartment::InternalMedicine => {
                "Track when the symptoms started, what makes them better or worse, and any \
                 medication you're taking; that history makes the consultation much faster."
            }
            DiagnosisDepartment::General => {
                "Keep a short note of your symptoms and how long they've lasted; a clinician \
                 can then direct you to the right specialty quickly."
            }
        }
    }
}

#[async_trait]
impl TurnHandler for DiagnosisHandler {
    fn id(&self) -> HandlerId {
        department_handler(self.department)
    }

    async fn handle(&self, _state: &ConversationState) -> Result<String, HandlerError> {
        Ok(format!(
            "Based on what you describe, this sounds like a question for {}. {} I can also book \
             you a follow-up appointment with the department — just say so. Please note I can't \
             replace an in-person examination.",
            self.department.label(),
            self.department_advice(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SessionId, UserId};
    use crate::domain::routing::Turn;

    fn test_state() -> ConversationState {
        let mut state = ConversationState::new(
            SessionId::new("session-1").unwrap(),
            UserId::new("patient-42").unwrap(),
        );
        state.push_turn(Turn::user("my chest hurts"));
        state
    }

    #[test]
    fn test_handler_id_matches_department() {
        let handler = DiagnosisHandler::new(DiagnosisDepartment::Cardiology);
        assert_eq!(handler.id(), HandlerId::CardiologyDiagnosisAgent);

        let handler = DiagnosisHandler::new(DiagnosisDepartment::General);
        assert_eq!(handler.id(), HandlerId::GeneralDiagnosisAgent);
    }

    #[tokio::test]
    async fn test_reply_mentions_department() {
        let handler = DiagnosisHandler::new(DiagnosisDepartment::Cardiology);
        let reply = handler.handle(&test_state()).await.unwrap();
        assert!(reply.contains("cardiology"));
    }
}
