//! Carelink - Conversational Patient Follow-up Service
//!
//! This crate implements the conversational core of a patient follow-up
//! assistant: per-turn intent routing over a reasoning oracle, dual
//! PostgreSQL connection pools, checkpointed conversation state, and
//! transactional care records.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
