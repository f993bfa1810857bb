//! Ports - interfaces to external collaborators.
//!
//! Following the hexagonal layout: the domain and application layers
//! depend on these traits; adapters implement them.

mod checkpoint_store;
mod intent_classifier;
mod record_store;

pub use checkpoint_store::{CheckpointError, CheckpointStore};
pub use intent_classifier::{
    ClassificationError, IntentClassifier, DEFAULT_CLARIFICATION,
};
pub use record_store::{AppointmentStore, BloodPressureStore, RecordStoreError};
