//! Intent taxonomy and classification results.
//!
//! The intent set mirrors the capabilities of the assistant: blood pressure
//! tracking, follow-up appointments, symptom triage by department, doctor
//! assistance, and an explicit `Unclear` bucket with a defined clarification
//! path. Classifier output is deserialized strictly; anything the schema
//! does not recognize degrades to `Unclear` rather than guessing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level intent of a user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    BloodPressure,
    Appointment,
    Diagnosis,
    DoctorAssistant,
    Unclear,
}

impl Intent {
    /// Wire name, as exchanged with the classifier and the API surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::BloodPressure => "blood_pressure",
            Intent::Appointment => "appointment",
            Intent::Diagnosis => "diagnosis",
            Intent::DoctorAssistant => "doctor_assistant",
            Intent::Unclear => "unclear",
        }
    }

    /// Parses a classifier-reported intent name; unknown names map to
    /// `None` so the caller can degrade deterministically.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "blood_pressure" => Some(Intent::BloodPressure),
            "appointment" => Some(Intent::Appointment),
            "diagnosis" => Some(Intent::Diagnosis),
            "doctor_assistant" => Some(Intent::DoctorAssistant),
            "unclear" => Some(Intent::Unclear),
            _ => None,
        }
    }

    /// All intent variants, for exhaustive table tests.
    pub fn all() -> [Intent; 5] {
        [
            Intent::BloodPressure,
            Intent::Appointment,
            Intent::Diagnosis,
            Intent::DoctorAssistant,
            Intent::Unclear,
        ]
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Department refinement of the diagnosis intent.
///
/// Unknown department names fold into `General` at deserialization time;
/// the handler mapping stays total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosisDepartment {
    #[serde(rename = "internal_medicine_diagnosis")]
    InternalMedicine,
    #[serde(rename = "surgery_diagnosis")]
    Surgery,
    #[serde(rename = "pediatrics_diagnosis")]
    Pediatrics,
    #[serde(rename = "gynecology_diagnosis")]
    Gynecology,
    #[serde(rename = "cardiology_diagnosis")]
    Cardiology,
    #[serde(rename = "general_diagnosis", other)]
    General,
}

impl DiagnosisDepartment {
    /// Wire name of the department sub-intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosisDepartment::InternalMedicine => "internal_medicine_diagnosis",
            DiagnosisDepartment::Surgery => "surgery_diagnosis",
            DiagnosisDepartment::Pediatrics => "pediatrics_diagnosis",
            DiagnosisDepartment::Gynecology => "gynecology_diagnosis",
            DiagnosisDepartment::Cardiology => "cardiology_diagnosis",
            DiagnosisDepartment::General => "general_diagnosis",
        }
    }

    /// Human-readable department label, used in handler replies.
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosisDepartment::InternalMedicine => "internal medicine",
            DiagnosisDepartment::Surgery => "surgery",
            DiagnosisDepartment::Pediatrics => "pediatrics",
            DiagnosisDepartment::Gynecology => "gynecology",
            DiagnosisDepartment::Cardiology => "cardiology",
            DiagnosisDepartment::General => "general consultation",
        }
    }

    /// All department variants, for exhaustive table tests.
    pub fn all() -> [DiagnosisDepartment; 6] {
        [
            DiagnosisDepartment::InternalMedicine,
            DiagnosisDepartment::Surgery,
            DiagnosisDepartment::Pediatrics,
            DiagnosisDepartment::Gynecology,
            DiagnosisDepartment::Cardiology,
            DiagnosisDepartment::General,
        ]
    }
}

impl fmt::Display for DiagnosisDepartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one classification call.
///
/// Produced fresh per call; feeds exactly one state update and is not
/// persisted beyond it.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentResult {
    pub intent: Intent,
    pub sub_intent: Option<DiagnosisDepartment>,
    /// Confidence in [0, 1]; values outside the range are clamped at
    /// construction.
    pub confidence: f32,
    pub needs_clarification: bool,
    pub reasoning: String,
    /// Entities the oracle extracted from the turn, passed through for
    /// observability and slot filling.
    pub entities: serde_json::Map<String, serde_json::Value>,
}

impl IntentResult {
    /// Creates a result with the confidence clamped into [0, 1].
    pub fn new(intent: Intent, confidence: f32, reasoning: impl Into<String>) -> Self {
        Self {
            intent,
            sub_intent: None,
            confidence: confidence.clamp(0.0, 1.0),
            needs_clarification: false,
            reasoning: reasoning.into(),
            entities: serde_json::Map::new(),
        }
    }

    /// Sets the diagnosis department refinement.
    pub fn with_sub_intent(mut self, sub_intent: DiagnosisDepartment) -> Self {
        self.sub_intent = Some(sub_intent);
        self
    }

    /// Sets the clarification flag.
    pub fn with_clarification(mut self, needs_clarification: bool) -> Self {
        self.needs_clarification = needs_clarification;
        self
    }

    /// Sets the extracted entities.
    pub fn with_entities(mut self, entities: serde_json::Map<String, serde_json::Value>) -> Self {
        self.entities = entities;
        self
    }

    /// The degraded result used whenever classification cannot be trusted:
    /// adapter failure, malformed oracle output, or an unknown intent name.
    pub fn unclear(reasoning: impl Into<String>) -> Self {
        Self {
            intent: Intent::Unclear,
            sub_intent: None,
            confidence: 0.0,
            needs_clarification: true,
            reasoning: reasoning.into(),
            entities: serde_json::Map::new(),
        }
    }
}

/// Identifier of the agent module a classified turn dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerId {
    #[serde(rename = "blood_pressure_agent")]
    BloodPressureAgent,
    #[serde(rename = "appointment_agent")]
    AppointmentAgent,
    #[serde(rename = "internal_medicine_diagnosis_agent")]
    InternalMedicineDiagnosisAgent,
    #[serde(rename = "surgery_diagnosis_agent")]
    SurgeryDiagnosisAgent,
    #[serde(rename = "pediatrics_diagnosis_agent")]
    PediatricsDiagnosisAgent,
    #[serde(rename = "gynecology_diagnosis_agent")]
    GynecologyDiagnosisAgent,
    #[serde(rename = "cardiology_diagnosis_agent")]
    CardiologyDiagnosisAgent,
    #[serde(rename = "general_diagnosis_agent")]
    GeneralDiagnosisAgent,
    #[serde(rename = "doctor_assistant_agent")]
    DoctorAssistantAgent,
}

impl HandlerId {
    /// Wire name of the handler.
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerId::BloodPressureAgent => "blood_pressure_agent",
            HandlerId::AppointmentAgent => "appointment_agent",
            HandlerId::InternalMedicineDiagnosisAgent => "internal_medicine_diagnosis_agent",
            HandlerId::SurgeryDiagnosisAgent => "surgery_diagnosis_agent",
            HandlerId::PediatricsDiagnosisAgent => "pediatrics_diagnosis_agent",
            HandlerId::GynecologyDiagnosisAgent => "gynecology_diagnosis_agent",
            HandlerId::CardiologyDiagnosisAgent => "cardiology_diagnosis_agent",
            HandlerId::GeneralDiagnosisAgent => "general_diagnosis_agent",
            HandlerId::DoctorAssistantAgent => "doctor_assistant_agent",
        }
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_serializes_snake_case() {
        let json = serde_json::to_string(&Intent::BloodPressure).unwrap();
        assert_eq!(json, "\"blood_pressure\"");
    }

    #[test]
    fn test_intent_parse_round_trip() {
        for intent in Intent::all() {
            assert_eq!(Intent::parse(intent.as_str()), Some(intent));
        }
    }

    #[test]
    fn test_intent_parse_unknown_is_none() {
        assert_eq!(Intent::parse("order_pizza"), None);
        assert_eq!(Intent::parse(""), None);
    }

    #[test]
    fn test_unknown_department_folds_to_general() {
        let dept: DiagnosisDepartment =
            serde_json::from_str("\"dermatology_diagnosis\"").unwrap();
        assert_eq!(dept, DiagnosisDepartment::General);
    }

    #[test]
    fn test_known_department_round_trip() {
        for dept in DiagnosisDepartment::all() {
            let json = serde_json::to_string(&dept).unwrap();
            let back: DiagnosisDepartment = serde_json::from_str(&json).unwrap();
            assert_eq!(back, dept);
        }
    }

    #[test]
    fn test_intent_result_clamps_confidence() {
        let result = IntentResult::new(Intent::Appointment, 1.7, "sure");
        assert_eq!(result.confidence, 1.0);

        let result = IntentResult::new(Intent::Appointment, -0.3, "unsure");
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_unclear_result_shape() {
        let result = IntentResult::unclear("oracle unreachable");
        assert_eq!(result.intent, Intent::Unclear);
        assert_eq!(result.confidence, 0.0);
        assert!(result.needs_clarification);
        assert!(result.sub_intent.is_none());
    }

    #[test]
    fn test_handler_id_wire_names() {
        let json = serde_json::to_string(&HandlerId::GeneralDiagnosisAgent).unwrap();
        assert_eq!(json, "\"general_diagnosis_agent\"");
        assert_eq!(
            HandlerId::BloodPressureAgent.to_string(),
            "blood_pressure_agent"
        );
    }
}
