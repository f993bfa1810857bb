//! Application layer: context wiring, turn orchestration, and handlers.

mod context;
pub mod handlers;
mod turn_service;

pub use context::{AppContext, BootstrapError};
pub use turn_service::{TurnError, TurnOutcome, TurnService, GENERIC_FAILURE_REPLY};
