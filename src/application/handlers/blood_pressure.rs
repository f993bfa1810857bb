//! Blood pressure agent: records and reviews readings.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::domain::records::NewBloodPressureReading;
use crate::domain::routing::{ConversationState, HandlerId};
use crate::ports::BloodPressureStore;

use super::{HandlerError, TurnHandler};

/// Handles blood pressure turns: records a stated reading or lists recent
/// ones. When the turn carries no reading, the handler asks for it within
/// its own reply instead of re-entering the router.
pub struct BloodPressureHandler {
    store: Arc<dyn BloodPressureStore>,
}

impl BloodPressureHandler {
    /// Creates a handler over a reading store.
    pub fn new(store: Arc<dyn BloodPressureStore>) -> Self {
        Self { store }
    }

    async fn list_readings(&self, state: &ConversationState) -> Result<String, HandlerError> {
        let readings = self.store.list_for_user(&state.user_id, 5).await?;
        if readings.is_empty() {
            return Ok(
                "You have no blood pressure readings on record yet. Tell me a reading like \
                 \"120/80\" and I'll save it."
                    .to_string(),
            );
        }

        let mut reply = String::from("Here are your most recent readings:\n");
        for reading in &readings {
            reply.push_str(&format!(
                "- {}/{} mmHg on {}\n",
                reading.systolic,
                reading.diastolic,
                reading.measurement_time.format("%Y-%m-%d %H:%M"),
            ));
        }
        Ok(reply.trim_end().to_string())
    }
}

#[async_trait]
impl TurnHandler for BloodPressureHandler {
    fn id(&self) -> HandlerId {
        HandlerId::BloodPressureAgent
    }

    async fn handle(&self, state: &ConversationState) -> Result<String, HandlerError> {
        let query = state.latest_user_query().unwrap_or_default();
        let lowered = query.to_lowercase();

        if let Some((systolic, diastolic)) = parse_reading(query) {
            let reading = match NewBloodPressureReading::new(
                state.user_id.clone(),
                systolic,
                diastolic,
                Utc::now(),
            ) {
                Ok(reading) => reading,
                Err(e) => {
                    info!(error = %e, "rejected implausible reading");
                    return Ok(format!(
                        "A reading of {}/{} mmHg doesn't look plausible. Could you double-check \
                         the values? Systolic should be the higher number, like \"120/80\".",
                        systolic, diastolic
                    ));
                }
            };

            let stored = self.store.record(&reading).await?;
            return Ok(format!(
                "Recorded your blood pressure reading of {}/{} mmHg. Say \"show my readings\" \
                 any time to review your history.",
                stored.systolic, stored.diastolic
            ));
        }

        if ["history", "readings", "show", "list", "review"]
            .iter()
            .any(|k| lowered.contains(k))
        {
            return self.list_readings(state).await;
        }

        Ok(
            "I can record that for you. What was the reading? Give me the systolic and \
             diastolic values, for example \"120/80\"."
                .to_string(),
        )
    }
}

/// Extracts a `systolic/diastolic` pair from free text.
///
/// Accepts `120/80` and `120 over 80`.
fn parse_reading(text: &str) -> Option<(i32, i32)> {
    let normalized = text.to_lowercase().replace(" over ", "/");
    for (idx, _) in normalized.match_indices('/') {
        let before: String = normalized[..idx]
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        let before: String = before.chars().rev().collect();
        let after: String = normalized[idx + 1..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();

        if let (Ok(systolic), Ok(diastolic)) = (before.parse(), after.parse()) {
            return Some((systolic, diastolic));
        }
    }
    None
}
