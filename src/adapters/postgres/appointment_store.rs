//! PostgreSQL implementation of AppointmentStore.
//!
//! Every operation runs on the transactional pool inside an explicit
//! transaction, committed on success and rolled back on drop otherwise.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::UserId;
use crate::domain::records::{Appointment, AppointmentStatus, NewAppointment};
use crate::ports::{AppointmentStore, RecordStoreError};

/// PostgreSQL implementation of AppointmentStore.
#[derive(Clone)]
pub struct PostgresAppointmentStore {
    pool: PgPool,
}

impl PostgresAppointmentStore {
    /// Creates a store over the transactional pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for PostgresAppointmentStore {
    async fn create(&self, appointment: &NewAppointment) -> Result<Appointment, RecordStoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query(
            r#"
            INSERT INTO appointments (
                user_id, department, doctor_name, appointment_date, status, notes
            ) VALUES ($1, $2, $3, $4, 'pending', $5)
            RETURNING id, user_id, department, doctor_name, appointment_date,
                      status, notes, created_at, updated_at
            "#,
        )
        .bind(appointment.user_id.as_str())
        .bind(&appointment.department)
        .bind(&appointment.doctor_name)
        .bind(appointment.appointment_date)
        .bind(&appointment.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        let stored = row_to_appointment(row)?;
        tx.commit().await.map_err(db_err)?;
        Ok(stored)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<Appointment>, RecordStoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let rows = sqlx::query(
            r#"
            SELECT id, user_id, department, doctor_name, appointment_date,
                   status, notes, created_at, updated_at
            FROM appointments
            WHERE user_id = $1
            ORDER BY appointment_date DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(limit)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        rows.into_iter().map(row_to_appointment).collect()
    }

    async fn cancel(
        &self,
        user_id: &UserId,
        appointment_id: i64,
    ) -> Result<Appointment, RecordStoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query(
            r#"
            UPDATE appointments
            SET status = 'cancelled', updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = 'pending'
            RETURNING id, user_id, department, doctor_name, appointment_date,
                      status, notes, created_at, updated_at
            "#,
        )
        .bind(appointment_id)
        .bind(user_id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => {
                let stored = row_to_appointment(row)?;
                tx.commit().await.map_err(db_err)?;
                Ok(stored)
            }
            None => Err(RecordStoreError::NotFound(format!(
                "no pending appointment {} for user {}",
                appointment_id, user_id
            ))),
        }
    }
}

fn db_err(e: sqlx::Error) -> RecordStoreError {
    RecordStoreError::DatabaseError(e.to_string())
}

fn row_to_appointment(row: PgRow) -> Result<Appointment, RecordStoreError> {
    let user_id: String = row.try_get("user_id").map_err(db_err)?;
    let status: String = row.try_get("status").map_err(db_err)?;

    Ok(Appointment {
        id: row.try_get("id").map_err(db_err)?,
        user_id: UserId::new(user_id)
            .map_err(|e| RecordStoreError::DatabaseError(e.to_string()))?,
        department: row.try_get("department").map_err(db_err)?,
        doctor_name: row.try_get("doctor_name").map_err(db_err)?,
        appointment_date: row.try_get("appointment_date").map_err(db_err)?,
        status: AppointmentStatus::parse(&status)
            .map_err(|e| RecordStoreError::DatabaseError(e.to_string()))?,
        notes: row.try_get("notes").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}
