//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid timezone name")]
    InvalidTimezone,

    #[error("Confidence threshold must be within [0.0, 1.0]")]
    InvalidConfidenceThreshold,

    #[error("Temperature must be within [0.0, 2.0]")]
    InvalidTemperature,

    #[error("Route iteration cap must be at least 1")]
    InvalidRouteIterationCap,

    #[error("History window must be at least 1 turn")]
    InvalidHistoryWindow,

    #[error("Invalid oracle base URL format")]
    InvalidOracleUrl,
}
