//! OASIS API Gateway Server
//!
//! Serves the clan, settings and avatar endpoints of the OASIS platform API
//! on top of PostgreSQL-backed managers.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;

use oasis_api_gateway::app::{configure_cors, create_app};
use oasis_api_gateway::config::Config;
use oasis_api_gateway::db;
use oasis_api_gateway::executor::Executor;
use oasis_api_gateway::fallback::{EnvSwitch, TEST_DATA_ENV_VAR};
use oasis_api_gateway::managers::{PgClanManager, PgSettingsManager};
use oasis_api_gateway::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(
        environment = %config.environment.as_str(),
        test_data = config.use_test_data,
        "Starting OASIS API gateway"
    );

    if config.environment.is_production() && config.use_test_data {
        tracing::warn!("Test data substitution is enabled in production");
    }

    let db_pool = db::create_pool(&config).context("Failed to configure database pool")?;

    if let Err(e) = db::run_migrations(&db_pool).await {
        // Requests will report the outage (or serve test data) until the
        // database comes back.
        tracing::error!(error = %e, "Database unavailable at startup");
    }

    let executor = Executor::new(Arc::new(EnvSwitch::new(
        TEST_DATA_ENV_VAR,
        config.use_test_data,
    )));

    let app_state = AppState::new(
        executor,
        Arc::new(PgClanManager::new(db_pool.clone())),
        Arc::new(PgSettingsManager::new(db_pool.clone())),
    )
    .with_terms(config.terms.clone())
    .with_db_pool(db_pool);

    let app = create_app(
        app_state,
        configure_cors(config.cors_allowed_origins.as_deref()),
    );

    let addr = SocketAddr::new(config.host, config.port);

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
