//! Blood pressure measurement records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{UserId, ValidationError};

/// Plausible systolic range in mmHg, matching the table check constraint.
pub const SYSTOLIC_RANGE: (i32, i32) = (50, 300);
/// Plausible diastolic range in mmHg, matching the table check constraint.
pub const DIASTOLIC_RANGE: (i32, i32) = (30, 200);

/// A stored blood pressure reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureReading {
    pub id: i64,
    pub user_id: UserId,
    pub systolic: i32,
    pub diastolic: i32,
    pub measurement_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated reading, not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBloodPressureReading {
    pub user_id: UserId,
    pub systolic: i32,
    pub diastolic: i32,
    pub measurement_time: DateTime<Utc>,
    pub notes: Option<String>,
}

impl NewBloodPressureReading {
    /// Validates and creates a reading.
    ///
    /// Both values must fall in their plausible ranges and the systolic
    /// value must exceed the diastolic one.
    pub fn new(
        user_id: UserId,
        systolic: i32,
        diastolic: i32,
        measurement_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if !(SYSTOLIC_RANGE.0..=SYSTOLIC_RANGE.1).contains(&systolic) {
            return Err(ValidationError::out_of_range(
                "systolic",
                SYSTOLIC_RANGE.0,
                SYSTOLIC_RANGE.1,
                systolic,
            ));
        }
        if !(DIASTOLIC_RANGE.0..=DIASTOLIC_RANGE.1).contains(&diastolic) {
            return Err(ValidationError::out_of_range(
                "diastolic",
                DIASTOLIC_RANGE.0,
                DIASTOLIC_RANGE.1,
                diastolic,
            ));
        }
        if systolic <= diastolic {
            return Err(ValidationError::invalid_format(
                "blood_pressure",
                format!(
                    "systolic ({}) must exceed diastolic ({})",
                    systolic, diastolic
                ),
            ));
        }
        Ok(Self {
            user_id,
            systolic,
            diastolic,
            measurement_time,
            notes: None,
        })
    }

    /// Attaches free-form notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> UserId {
        UserId::new("patient-42").unwrap()
    }

    #[test]
    fn test_valid_reading() {
        let reading = NewBloodPressureReading::new(test_user(), 120, 80, Utc::now()).unwrap();
        assert_eq!(reading.systolic, 120);
        assert_eq!(reading.diastolic, 80);
    }

    #[test]
    fn test_systolic_out_of_range() {
        assert!(NewBloodPressureReading::new(test_user(), 400, 80, Utc::now()).is_err());
        assert!(NewBloodPressureReading::new(test_user(), 40, 35, Utc::now()).is_err());
    }

    #[test]
    fn test_diastolic_out_of_range() {
        assert!(NewBloodPressureReading::new(test_user(), 120, 20, Utc::now()).is_err());
        assert!(NewBloodPressureReading::new(test_user(), 250, 220, Utc::now()).is_err());
    }

    #[test]
    fn test_systolic_must_exceed_diastolic() {
        assert!(NewBloodPressureReading::new(test_user(), 90, 90, Utc::now()).is_err());
        assert!(NewBloodPressureReading::new(test_user(), 80, 90, Utc::now()).is_err());
    }

    #[test]
    fn test_notes_builder() {
        let reading = NewBloodPressureReading::new(test_user(), 120, 80, Utc::now())
            .unwrap()
            .with_notes("after morning walk");
        assert_eq!(reading.notes.as_deref(), Some("after morning walk"));
    }
}
