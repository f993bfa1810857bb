//! Care record entities persisted through the transactional pool.

mod appointment;
mod blood_pressure;

pub use appointment::{Appointment, AppointmentStatus, NewAppointment};
pub use blood_pressure::{
    BloodPressureReading, NewBloodPressureReading, DIASTOLIC_RANGE, SYSTOLIC_RANGE,
};
