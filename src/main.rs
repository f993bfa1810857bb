//! Carelink service binary.
//!
//! Loads configuration, initializes tracing and the dual pools, wires the
//! application context, and serves the HTTP surface. Any startup error
//! aborts the process: the service never runs half-initialized.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use carelink::adapters::http;
use carelink::application::AppContext;
use carelink::config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Tracing may not be initialized yet when config loading fails.
        eprintln!("fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(config.is_production());

    let ctx = match AppContext::initialize(config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = %e, "startup failed");
            return Err(e.into());
        }
    };

    let addr = ctx.config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "carelink listening");

    axum::serve(listener, http::router(ctx.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ctx.shutdown().await;
    Ok(())
}

fn init_tracing(production: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if production {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        error!("failed to listen for shutdown signal");
    }
}
