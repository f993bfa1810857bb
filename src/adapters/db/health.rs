//! Database health checking.
//!
//! Probes both pools independently and aggregates a combined status
//! without conflating the two lifecycles: one degraded side yields a
//! degraded report, never a crash.

use serde::Serialize;
use sqlx::postgres::PgPool;
use tracing::error;

use super::pool::DualPoolStats;

/// Combined health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
    Error,
}

/// Probe outcome of one pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolProbe {
    Ok,
    NotInitialized,
    Error,
}

/// Health report for the dual pool manager.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub autocommit_pool: PoolProbe,
    pub transactional_pool: PoolProbe,
    /// Human-readable probe failures, empty when healthy.
    pub errors: Vec<String>,
    pub stats: DualPoolStats,
}

/// Probes the two pools with a trivial query each.
pub struct HealthChecker {
    autocommit: Option<PgPool>,
    transactional: Option<PgPool>,
}

impl HealthChecker {
    /// Creates a checker over whichever pools exist.
    pub fn new(autocommit: Option<PgPool>, transactional: Option<PgPool>) -> Self {
        Self {
            autocommit,
            transactional,
        }
    }

    /// Runs both probes and assembles the report.
    pub async fn check(&self, stats: DualPoolStats) -> HealthReport {
        let mut errors = Vec::new();

        let autocommit_pool = Self::probe(self.autocommit.as_ref(), "autocommit", &mut errors).await;
        let transactional_pool =
            Self::probe(self.transactional.as_ref(), "transactional", &mut errors).await;

        let healthy_sides = [&autocommit_pool, &transactional_pool]
            .into_iter()
            .filter(|p| matches!(p, PoolProbe::Ok))
            .count();
        let status = match healthy_sides {
            2 => HealthStatus::Ok,
            1 => HealthStatus::Degraded,
            _ => HealthStatus::Error,
        };

        HealthReport {
            status,
            autocommit_pool,
            transactional_pool,
            errors,
            stats,
        }
    }

    async fn probe(pool: Option<&PgPool>, name: &str, errors: &mut Vec<String>) -> PoolProbe {
        let Some(pool) = pool else {
            errors.push(format!("{} pool not initialized", name));
            return PoolProbe::NotInitialized;
        };

        match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await {
            Ok(1) => PoolProbe::Ok,
            Ok(other) => {
                error!(pool = name, value = other, "health probe returned unexpected value");
                errors.push(format!("{} pool probe returned unexpected value", name));
                PoolProbe::Error
            }
            Err(e) => {
                error!(pool = name, error = %e, "health probe failed");
                errors.push(format!("{} pool probe failed: {}", name, e));
                PoolProbe::Error
            }
        }
    }
}
