//! PostgreSQL implementation of BloodPressureStore.
//!
//! Operations run on the transactional pool with explicit commit/rollback
//! boundaries, scoped by user id.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::UserId;
use crate::domain::records::{BloodPressureReading, NewBloodPressureReading};
use crate::ports::{BloodPressureStore, RecordStoreError};

/// PostgreSQL implementation of BloodPressureStore.
#[derive(Clone)]
pub struct PostgresBloodPressureStore {
    pool: PgPool,
}

impl PostgresBloodPressureStore {
    /// Creates a store over the transactional pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BloodPressureStore for PostgresBloodPressureStore {
    async fn record(
        &self,
        reading: &NewBloodPressureReading,
    ) -> Result<BloodPressureReading, RecordStoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query(
            r#"
            INSERT INTO blood_pressure_records (
                user_id, systolic, diastolic, measurement_time, notes
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, systolic, diastolic, measurement_time, notes, created_at
            "#,
        )
        .bind(reading.user_id.as_str())
        .bind(reading.systolic)
        .bind(reading.diastolic)
        .bind(reading.measurement_time)
        .bind(&reading.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        let stored = row_to_reading(row)?;
        tx.commit().await.map_err(db_err)?;
        Ok(stored)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<BloodPressureReading>, RecordStoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let rows = sqlx::query(
            r#"
            SELECT id, user_id, systolic, diastolic, measurement_time, notes, created_at
            FROM blood_pressure_records
            WHERE user_id = $1
            ORDER BY measurement_time DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(limit)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        rows.into_iter().map(row_to_reading).collect()
    }
}

fn db_err(e: sqlx::Error) -> RecordStoreError {
    RecordStoreError::DatabaseError(e.to_string())
}

fn row_to_reading(row: PgRow) -> Result<BloodPressureReading, RecordStoreError> {
    let user_id: String = row.try_get("user_id").map_err(db_err)?;

    Ok(BloodPressureReading {
        id: row.try_get("id").map_err(db_err)?,
        user_id: UserId::new(user_id)
            .map_err(|e| RecordStoreError::DatabaseError(e.to_string()))?,
        systolic: row.try_get("systolic").map_err(db_err)?,
        diastolic: row.try_get("diastolic").map_err(db_err)?,
        measurement_time: row.try_get("measurement_time").map_err(db_err)?,
        notes: row.try_get("notes").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}
