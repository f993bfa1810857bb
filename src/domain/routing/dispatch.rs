//! Static intent-to-handler dispatch table.
//!
//! The mapping is total over `(Intent, Option<DiagnosisDepartment>)`:
//! every confident intent resolves to exactly one handler, a generic
//! diagnosis without a department defaults to internal medicine, and the
//! `General` department (which also absorbs unknown department names at
//! deserialization) backs the general-diagnosis fallback. Only `Unclear`
//! maps to no handler, and `Unclear` always has a clarification path.

use super::intent::{DiagnosisDepartment, HandlerId, Intent};

/// Resolves the handler for a classified intent.
///
/// Returns `None` only for [`Intent::Unclear`].
pub fn handler_for(intent: Intent, sub_intent: Option<DiagnosisDepartment>) -> Option<HandlerId> {
    match intent {
        Intent::BloodPressure => Some(HandlerId::BloodPressureAgent),
        Intent::Appointment => Some(HandlerId::AppointmentAgent),
        Intent::DoctorAssistant => Some(HandlerId::DoctorAssistantAgent),
        Intent::Diagnosis => Some(match sub_intent {
            Some(department) => department_handler(department),
            // Generic diagnosis without a department refinement defaults to
            // internal medicine.
            None => HandlerId::InternalMedicineDiagnosisAgent,
        }),
        Intent::Unclear => None,
    }
}

/// Maps a diagnosis department to its dedicated handler.
pub fn department_handler(department: DiagnosisDepartment) -> HandlerId {
    match department {
        DiagnosisDepartment::InternalMedicine => HandlerId::InternalMedicineDiagnosisAgent,
        DiagnosisDepartment::Surgery => HandlerId::SurgeryDiagnosisAgent,
        DiagnosisDepartment::Pediatrics => HandlerId::PediatricsDiagnosisAgent,
        DiagnosisDepartment::Gynecology => HandlerId::GynecologyDiagnosisAgent,
        DiagnosisDepartment::Cardiology => HandlerId::CardiologyDiagnosisAgent,
        DiagnosisDepartment::General => HandlerId::GeneralDiagnosisAgent,
    }
}
