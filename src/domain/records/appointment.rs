//! Follow-up appointment records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{StateMachine, UserId, ValidationError};

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Database representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Parses the database representation.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "pending" => Ok(AppointmentStatus::Pending),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "appointment_status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

impl StateMachine for AppointmentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use AppointmentStatus::*;
        matches!((self, target), (Pending, Completed) | (Pending, Cancelled))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use AppointmentStatus::*;
        match self {
            Pending => vec![Completed, Cancelled],
            Completed => vec![],
            Cancelled => vec![],
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored follow-up appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub user_id: UserId,
    pub department: String,
    pub doctor_name: Option<String>,
    pub appointment_date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated appointment request, not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub user_id: UserId,
    pub department: String,
    pub doctor_name: Option<String>,
    pub appointment_date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl NewAppointment {
    /// Creates a new appointment request; the department must be non-empty.
    pub fn new(
        user_id: UserId,
        department: impl Into<String>,
        appointment_date: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let department = department.into();
        if department.trim().is_empty() {
            return Err(ValidationError::empty_field("department"));
        }
        Ok(Self {
            user_id,
            department,
            doctor_name: None,
            appointment_date,
            notes: None,
        })
    }

    /// Attaches a doctor name.
    pub fn with_doctor(mut self, doctor_name: impl Into<String>) -> Self {
        self.doctor_name = Some(doctor_name.into());
        self
    }

    /// Attaches free-form notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
