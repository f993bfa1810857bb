//! Reasoning-oracle adapters for the intent classifier port.

mod chat_client;
mod classifier;
mod mock;

pub use chat_client::ChatClient;
pub use classifier::OracleIntentClassifier;
pub use mock::{MockIntentClassifier, RecordedCall};
