//! Oracle-backed implementation of IntentClassifier.
//!
//! The oracle is asked for a strict JSON object; the reply is parsed with a
//! schema-validated deserializer that deterministically maps anything
//! unknown or malformed to the `Unclear` intent instead of guessing.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::routing::{DiagnosisDepartment, Intent, IntentResult};
use crate::ports::{ClassificationError, IntentClassifier, DEFAULT_CLARIFICATION};

use super::chat_client::ChatClient;

const INTENT_PROMPT: &str = r#"You are an intent router for a patient follow-up assistant. Identify the user's real intent.

Supported intent types:
1. blood_pressure: the user wants to record, review, or manage blood pressure readings.
   - keywords: blood pressure, systolic, diastolic, reading, record, history
2. appointment: the user wants to book, review, or cancel a follow-up appointment.
   - keywords: appointment, follow-up, booking, schedule, visit, cancel
3. diagnosis: the user describes symptoms and wants guidance.
   - set sub_intent to one of: internal_medicine_diagnosis, surgery_diagnosis,
     pediatrics_diagnosis, gynecology_diagnosis, cardiology_diagnosis, general_diagnosis
4. doctor_assistant: a clinician asks for help with records, prescriptions, or patient queries.
5. unclear: the message cannot be assigned to any intent above.

Reply with a JSON object only:
{
    "intent_type": "blood_pressure | appointment | diagnosis | doctor_assistant | unclear",
    "sub_intent": "department sub-intent when intent_type is diagnosis, else null",
    "confidence": 0.0,
    "entities": {},
    "need_clarification": false,
    "reasoning": "one short sentence"
}

Rules:
- If the intent is obvious, set confidence above 0.8 and need_clarification to false.
- If the message is ambiguous, set confidence below 0.8 and need_clarification to true.
- If several intents are mentioned, prefer doctor_assistant over appointment over blood_pressure.
- A very short message ("hi", "are you there") with an active intent usually continues that intent."#;

const CLARIFY_PROMPT: &str = r#"You are a friendly assistant for a patient follow-up service. The user's intent is unclear.

The service can: record and review blood pressure readings, manage follow-up appointments, and answer symptom questions.

Write one short, friendly question (at most 50 words) guiding the user to state what they need."#;

/// Intent classifier backed by a chat completion oracle.
pub struct OracleIntentClassifier {
    client: ChatClient,
}

impl OracleIntentClassifier {
    /// Creates a classifier over a chat client.
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IntentClassifier for OracleIntentClassifier {
    async fn classify(
        &self,
        query: &str,
        history_window: Option<&str>,
        current_intent: Option<Intent>,
    ) -> Result<IntentResult, ClassificationError> {
        let user_block = format!(
            "User message: {}\n\nConversation history:\n{}\n\nCurrent intent: {}\n\nIdentify the user's real intent and reply with the JSON object.",
            query,
            history_window.unwrap_or("none"),
            current_intent.map(|i| i.as_str()).unwrap_or("none"),
        );

        let reply = self.client.complete(INTENT_PROMPT, &user_block).await?;
        debug!(reply_len = reply.len(), "oracle classification reply received");
        Ok(parse_intent_reply(&reply))
    }

    async fn clarify(&self, query: &str) -> String {
        let user_block = format!("User message: {}\n\nWrite the clarification question.", query);
        match self.client.complete(CLARIFY_PROMPT, &user_block).await {
            Ok(reply) => {
                let reply = reply.trim();
                if reply.is_empty() {
                    DEFAULT_CLARIFICATION.to_string()
                } else {
                    reply.to_string()
                }
            }
            Err(e) => {
                warn!(error = %e, "clarification generation failed, using default");
                DEFAULT_CLARIFICATION.to_string()
            }
        }
    }
}

/// Raw oracle payload before schema validation.
#[derive(Debug, Deserialize)]
struct RawIntentPayload {
    intent_type: Option<String>,
    sub_intent: Option<String>,
    confidence: Option<f32>,
    entities: Option<serde_json::Map<String, Value>>,
    need_clarification: Option<bool>,
    reasoning: Option<String>,
}

/// Parses the oracle's reply into an [`IntentResult`].
///
/// Extracts the outermost JSON object (models occasionally wrap it in
/// prose), validates it against the expected schema, and degrades any
/// unknown intent name, missing object, or parse failure to `Unclear`.
fn parse_intent_reply(reply: &str) -> IntentResult {
    let (Some(start), Some(end)) = (reply.find('{'), reply.rfind('}')) else {
        warn!("oracle reply contained no JSON object");
        return IntentResult::unclear("oracle reply contained no JSON object");
    };
    if end < start {
        return IntentResult::unclear("oracle reply contained no JSON object");
    }

    let raw: RawIntentPayload = match serde_json::from_str(&reply[start..=end]) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "oracle reply was not valid JSON");
            return IntentResult::unclear(format!("oracle reply was not valid JSON: {}", e));
        }
    };

    let intent_name = raw.intent_type.unwrap_or_default();
    let Some(intent) = Intent::parse(&intent_name) else {
        warn!(intent = %intent_name, "oracle reported unknown intent");
        return IntentResult::unclear(format!("unknown intent '{}'", intent_name));
    };

    let confidence = raw.confidence.unwrap_or(0.0);
    // Unknown department names fold into General at deserialization.
    let sub_intent = raw.sub_intent.and_then(|s| {
        serde_json::from_value::<DiagnosisDepartment>(Value::String(s)).ok()
    });

    let mut result = IntentResult::new(
        intent,
        confidence,
        raw.reasoning.unwrap_or_default(),
    )
    .with_clarification(raw.need_clarification.unwrap_or(confidence < 0.8));
    if let Some(entities) = raw.entities {
        result = result.with_entities(entities);
    }
    if let Some(sub_intent) = sub_intent {
        result = result.with_sub_intent(sub_intent);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_reply() {
        let reply = r#"{
            "intent_type": "blood_pressure",
            "sub_intent": null,
            "confidence": 0.92,
            "entities": {"systolic": 120, "diastolic": 80},
            "need_clarification": false,
            "reasoning": "user states a reading"
        }"#;

        let result = parse_intent_reply(reply);
        assert_eq!(result.intent, Intent::BloodPressure);
        assert_eq!(result.confidence, 0.92);
        assert!(!result.needs_clarification);
        assert_eq!(result.entities["systolic"], 120);
    }

    #[test]
    fn test_parse_reply_wrapped_in_prose() {
        let reply = "Sure! Here is the classification:\n{\"intent_type\": \"appointment\", \"confidence\": 0.85}\nLet me know if you need more.";

        let result = parse_intent_reply(reply);
        assert_eq!(result.intent, Intent::Appointment);
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_parse_no_json_degrades_to_unclear() {
        let result = parse_intent_reply("I could not classify that.");
        assert_eq!(result.intent, Intent::Unclear);
        assert!(result.needs_clarification);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_parse_malformed_json_degrades_to_unclear() {
        let result = parse_intent_reply("{\"intent_type\": \"appointment\", \"confidence\": }");
        assert_eq!(result.intent, Intent::Unclear);
        assert!(result.needs_clarification);
    }

    #[test]
    fn test_parse_unknown_intent_degrades_to_unclear() {
        let result = parse_intent_reply("{\"intent_type\": \"order_pizza\", \"confidence\": 0.99}");
        assert_eq!(result.intent, Intent::Unclear);
    }

    #[test]
    fn test_parse_unknown_department_folds_to_general() {
        let reply = r#"{
            "intent_type": "diagnosis",
            "sub_intent": "dermatology_diagnosis",
            "confidence": 0.9
        }"#;

        let result = parse_intent_reply(reply);
        assert_eq!(result.intent, Intent::Diagnosis);
        assert_eq!(result.sub_intent, Some(DiagnosisDepartment::General));
    }

    #[test]
    fn test_parse_clamps_out_of_range_confidence() {
        let result = parse_intent_reply("{\"intent_type\": \"appointment\", \"confidence\": 7.5}");
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_parse_defaults_clarification_from_confidence() {
        let result = parse_intent_reply("{\"intent_type\": \"appointment\", \"confidence\": 0.4}");
        assert!(result.needs_clarification);

        let result = parse_intent_reply("{\"intent_type\": \"appointment\", \"confidence\": 0.9}");
        assert!(!result.needs_clarification);
    }
}
