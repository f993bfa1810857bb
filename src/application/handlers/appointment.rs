//! Appointment agent: books, lists, and cancels follow-up appointments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use tracing::info;

use crate::domain::records::NewAppointment;
use crate::domain::routing::{ConversationState, HandlerId};
use crate::ports::{AppointmentStore, RecordStoreError};

use super::{HandlerError, TurnHandler};

/// Keyword hints mapped to clinic departments.
static DEPARTMENT_KEYWORDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("heart", "cardiology"),
        ("cardio", "cardiology"),
        ("chest", "cardiology"),
        ("child", "pediatrics"),
        ("pediatric", "pediatrics"),
        ("kid", "pediatrics"),
        ("gynecolog", "gynecology"),
        ("women", "gynecology"),
        ("surg", "surgery"),
        ("operation", "surgery"),
        ("internal", "internal medicine"),
        ("stomach", "internal medicine"),
        ("general", "general medicine"),
    ])
});

/// Default lead time for a booked follow-up.
const FOLLOW_UP_LEAD_DAYS: i64 = 7;

/// Handles appointment turns. A booking request missing its department is
/// answered with a follow-up question inside this single dispatch rather
/// than re-entering the router.
pub struct AppointmentHandler {
    store: Arc<dyn AppointmentStore>,
}

impl AppointmentHandler {
    /// Creates a handler over an appointment store.
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    async fn list(&self, state: &ConversationState) -> Result<String, HandlerError> {
        let appointments = self.store.list_for_user(&state.user_id, 5).await?;
        if appointments.is_empty() {
            return Ok(
                "You have no appointments on record. Tell me which department you'd like to \
                 visit and I'll book a follow-up."
                    .to_string(),
            );
        }

        let mut reply = String::from("Here are your appointments:\n");
        for appointment in &appointments {
            reply.push_str(&format!(
                "- #{}: {} on {} ({})\n",
                appointment.id,
                appointment.department,
                appointment.appointment_date.format("%Y-%m-%d %H:%M"),
                appointment.status,
            ));
        }
        reply.push_str("Say \"cancel #<number>\" to cancel a pending one.");
        Ok(reply)
    }

    async fn cancel(&self, state: &ConversationState, text: &str) -> Result<String, HandlerError> {
        let Some(id) = parse_appointment_id(text) else {
            return self.list(state).await;
        };

        match self.store.cancel(&state.user_id, id).await {
            Ok(appointment) => Ok(format!(
                "Cancelled your {} appointment on {}.",
                appointment.department,
                appointment.appointment_date.format("%Y-%m-%d %H:%M"),
            )),
            Err(RecordStoreError::NotFound(_)) => Ok(format!(
                "I couldn't find a pending appointment #{} of yours. Say \"show my \
                 appointments\" to see what's on record.",
                id
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn book(&self, state: &ConversationState, text: &str) -> Result<String, HandlerError> {
        let Some(department) = detect_department(text) else {
            return Ok(
                "Which department should the follow-up be with? For example cardiology, \
                 internal medicine, pediatrics, gynecology, or surgery."
                    .to_string(),
            );
        };

        let date = Utc::now() + Duration::days(FOLLOW_UP_LEAD_DAYS);
        let request = NewAppointment::new(state.user_id.clone(), department, date)?
            .with_notes(text.to_string());
        let appointment = self.store.create(&request).await?;

        info!(
            appointment_id = appointment.id,
            department = %appointment.department,
            "appointment booked"
        );
        Ok(format!(
            "Booked appointment #{} with {} on {}. Say \"cancel #{}\" if you need to change it.",
            appointment.id,
            appointment.department,
            appointment.appointment_date.format("%Y-%m-%d %H:%M"),
            appointment.id,
        ))
    }
}

#[async_trait]
impl TurnHandler for AppointmentHandler {
    fn id(&self) -> HandlerId {
        HandlerId::AppointmentAgent
    }

    async fn handle(&self, state: &ConversationState) -> Result<String, HandlerError> {
        let query = state.latest_user_query().unwrap_or_default();
        let lowered = query.to_lowercase();

        if lowered.contains("cancel") {
            return self.cancel(state, &lowered).await;
        }
        if ["show", "list", "my appointments", "upcoming", "what do i have"]
            .iter()
            .any(|k| lowered.contains(k))
        {
            return self.list(state).await;
        }
        self.book(state, query).await
    }
}

/// Finds the department a booking request refers to, if any.
fn detect_department(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    DEPARTMENT_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(*keyword))
        .map(|(_, department)| *department)
}

/// Extracts the first integer in the text, used as an appointment id.
fn parse_appointment_id(text: &str) -> Option<i64> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_department() {
        assert_eq!(
            detect_department("my heart has been racing"),
            Some("cardiology")
        );
        assert_eq!(
            detect_department("follow-up for my child"),
            Some("pediatrics")
        );
        assert_eq!(detect_department("book something"), None);
    }

    #[test]
    fn test_parse_appointment_id() {
        assert_eq!(parse_appointment_id("cancel #12 please"), Some(12));
        assert_eq!(parse_appointment_id("cancel 7"), Some(7));
        assert_eq!(parse_appointment_id("cancel it"), None);
    }
}
