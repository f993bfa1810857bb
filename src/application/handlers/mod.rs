//! Turn handlers - the agent modules a classified turn dispatches to.
//!
//! Each handler receives the conversation state, performs its work through
//! the record-store ports, and returns the reply text for the turn. Handler
//! failures are recovered by the turn service into a generic user-facing
//! message; they never corrupt state or surface internal detail.

mod appointment;
mod blood_pressure;
mod diagnosis;
mod doctor_assistant;

pub use appointment::AppointmentHandler;
pub use blood_pressure::BloodPressureHandler;
pub use diagnosis::DiagnosisHandler;
pub use doctor_assistant::DoctorAssistantHandler;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::ValidationError;
use crate::domain::routing::{ConversationState, DiagnosisDepartment, HandlerId};
use crate::ports::{AppointmentStore, BloodPressureStore, RecordStoreError};

/// Errors a handler can surface to the turn service.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("record store failure: {0}")]
    Store(#[from] RecordStoreError),

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
}

/// One dispatchable agent module.
#[async_trait]
pub trait TurnHandler: Send + Sync {
    /// The id this handler is registered under.
    fn id(&self) -> HandlerId;

    /// Handles the latest user turn and returns the reply text.
    async fn handle(&self, state: &ConversationState) -> Result<String, HandlerError>;
}

/// Registry of handlers by id.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<HandlerId, Arc<dyn TurnHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under its own id.
    pub fn register(&mut self, handler: Arc<dyn TurnHandler>) {
        self.handlers.insert(handler.id(), handler);
    }

    /// Looks up a handler by id.
    pub fn resolve(&self, id: HandlerId) -> Option<Arc<dyn TurnHandler>> {
        self.handlers.get(&id).cloned()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Builds the full default registry over the given stores.
    pub fn with_defaults(
        appointments: Arc<dyn AppointmentStore>,
        readings: Arc<dyn BloodPressureStore>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(BloodPressureHandler::new(readings)));
        registry.register(Arc::new(AppointmentHandler::new(appointments)));
        for department in DiagnosisDepartment::all() {
            registry.register(Arc::new(DiagnosisHandler::new(department)));
        }
        registry.register(Arc::new(DoctorAssistantHandler::new()));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_resolves_registered_handler() {
        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(DoctorAssistantHandler::new()));

        assert!(registry.resolve(HandlerId::DoctorAssistantAgent).is_some());
        assert!(registry.resolve(HandlerId::AppointmentAgent).is_none());
    }

    #[test]
    fn test_diagnosis_handlers_cover_all_departments() {
        let mut registry = HandlerRegistry::new();
        for department in DiagnosisDepartment::all() {
            registry.register(Arc::new(DiagnosisHandler::new(department)));
        }
        assert_eq!(registry.len(), 6);
    }
}
