//! PostgreSQL adapters for the persistence ports.

mod appointment_store;
mod blood_pressure_store;
mod checkpoint_store;

pub use appointment_store::PostgresAppointmentStore;
pub use blood_pressure_store::PostgresBloodPressureStore;
pub use checkpoint_store::PostgresCheckpointStore;
