//! Dual connection-pool management against one PostgreSQL database.

mod error;
mod health;
mod pool;

pub use error::{DatabaseError, DisposalError, TeardownError};
pub use health::{HealthChecker, HealthReport, HealthStatus, PoolProbe};
pub use pool::{translate_uri, DualPoolManager, DualPoolStats, PoolKind, PoolStats};
