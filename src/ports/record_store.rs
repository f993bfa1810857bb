//! Record Store Ports - Interfaces for the relational care records.
//!
//! Consumed by handlers, never by the router. Implementations run every
//! operation through the transactional pool with an explicit
//! commit/rollback boundary, scoped by user id.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::UserId;
use crate::domain::records::{
    Appointment, BloodPressureReading, NewAppointment, NewBloodPressureReading,
};

/// Errors that can occur during record store operations
#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Port for follow-up appointment records
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Creates an appointment and returns the stored record.
    async fn create(&self, appointment: &NewAppointment) -> Result<Appointment, RecordStoreError>;

    /// Lists a user's appointments, most recent first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<Appointment>, RecordStoreError>;

    /// Cancels a pending appointment owned by the user.
    ///
    /// Returns `RecordStoreError::NotFound` when the user has no such
    /// pending appointment.
    async fn cancel(
        &self,
        user_id: &UserId,
        appointment_id: i64,
    ) -> Result<Appointment, RecordStoreError>;
}

/// Port for blood pressure measurement records
#[async_trait]
pub trait BloodPressureStore: Send + Sync {
    /// Records a reading and returns the stored record.
    async fn record(
        &self,
        reading: &NewBloodPressureReading,
    ) -> Result<BloodPressureReading, RecordStoreError>;

    /// Lists a user's readings, most recent first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<BloodPressureReading>, RecordStoreError>;
}
