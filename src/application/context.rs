//! Process-scoped application context.
//!
//! Built exactly once at startup and passed by reference into the HTTP
//! adapter and anything else that needs the wired services. There is no
//! module-level singleton: every dependency flows through this object.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::adapters::db::{DatabaseError, DualPoolManager, HealthReport};
use crate::adapters::llm::{ChatClient, OracleIntentClassifier};
use crate::adapters::postgres::{
    PostgresAppointmentStore, PostgresBloodPressureStore, PostgresCheckpointStore,
};
use crate::config::AppConfig;
use crate::domain::routing::TurnRouter;
use crate::ports::ClassificationError;

use super::handlers::HandlerRegistry;
use super::turn_service::TurnService;

/// Errors that abort startup. The process must not run half-initialized.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("database bootstrap failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("oracle client bootstrap failed: {0}")]
    Oracle(#[from] ClassificationError),
}

/// The wired application.
pub struct AppContext {
    pub config: AppConfig,
    pub pools: Arc<DualPoolManager>,
    pub turn_service: Arc<TurnService>,
}

impl AppContext {
    /// Initializes pools, stores, classifier, router, and the turn
    /// service. Any failure here is fatal.
    pub async fn initialize(config: AppConfig) -> Result<Arc<Self>, BootstrapError> {
        let pools = Arc::new(DualPoolManager::new(config.database.clone()));
        pools.initialize().await?;

        let checkpoint_pool = pools.checkpoint_pool().await?;
        let transactional_pool = pools.transactional_pool().await?;

        if config.database.run_migrations {
            info!("running database migrations");
            sqlx::migrate!("./migrations")
                .run(&transactional_pool)
                .await?;
        }

        let classifier = Arc::new(OracleIntentClassifier::new(ChatClient::new(&config.ai)?));
        let router = TurnRouter::new(
            classifier,
            config.routing.confidence_threshold,
            config.routing.history_window,
        );

        let checkpoints = Arc::new(PostgresCheckpointStore::new(checkpoint_pool));
        let appointments = Arc::new(PostgresAppointmentStore::new(transactional_pool.clone()));
        let readings = Arc::new(PostgresBloodPressureStore::new(transactional_pool));
        let handlers = HandlerRegistry::with_defaults(appointments, readings);

        let turn_service = Arc::new(TurnService::new(
            router,
            checkpoints,
            handlers,
            config.routing.max_route_iterations,
        ));

        info!("application context initialized");
        Ok(Arc::new(Self {
            config,
            pools,
            turn_service,
        }))
    }

    /// Current health of the dual pools.
    pub async fn health(&self) -> HealthReport {
        self.pools.health_check().await
    }

    /// Tears down the pools; disposal errors are logged, never panicked.
    pub async fn shutdown(&self) {
        if let Err(e) = self.pools.close().await {
            for disposal in &e.errors {
                error!(error = %disposal, "pool disposal failed during shutdown");
            }
        } else {
            info!("shutdown complete");
        }
    }
}
