//! Database error taxonomy.

use thiserror::Error;

use super::pool::PoolKind;

/// Errors from pool management and database access.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The connection URI or pool settings are unusable. Fatal at startup.
    #[error("invalid database configuration: {0}")]
    Configuration(String),

    /// A pool could not be created. Fatal at startup: the service cannot
    /// run without both pools.
    #[error("connection pool initialization failed: {0}")]
    PoolInitialization(#[source] sqlx::Error),

    /// A pool was requested before initialization.
    #[error("{0} pool not initialized")]
    NotInitialized(PoolKind),
}

/// Failure to dispose one pool during teardown.
#[derive(Debug, Error)]
#[error("failed to dispose {kind} pool: {message}")]
pub struct DisposalError {
    pub kind: PoolKind,
    pub message: String,
}

/// Aggregate teardown failure. Disposal of each pool is attempted
/// independently; every failure is collected here.
#[derive(Debug, Error)]
#[error("pool teardown completed with {} error(s)", .errors.len())]
pub struct TeardownError {
    pub errors: Vec<DisposalError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposal_error_display() {
        let err = DisposalError {
            kind: PoolKind::Transactional,
            message: "connections still checked out".to_string(),
        };
        assert!(err.to_string().contains("transactional"));
        assert!(err.to_string().contains("checked out"));
    }

    #[test]
    fn test_teardown_error_counts() {
        let err = TeardownError {
            errors: vec![
                DisposalError {
                    kind: PoolKind::Transactional,
                    message: "a".to_string(),
                },
                DisposalError {
                    kind: PoolKind::Autocommit,
                    message: "b".to_string(),
                },
            ],
        };
        assert!(err.to_string().contains("2 error(s)"));
    }

    #[test]
    fn test_not_initialized_display() {
        let err = DatabaseError::NotInitialized(PoolKind::Autocommit);
        assert_eq!(err.to_string(), "autocommit pool not initialized");
    }
}
