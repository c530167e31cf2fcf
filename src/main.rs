//! Foundation Patrons API server.
//!
//! Configuration comes from `PATRONS__*` environment variables (and an
//! optional `.env` file).

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use foundation_patrons::adapters::{
    build_router, run_migrations, InMemoryPatronRepository, PatronAppState,
    PostgresPatronRepository,
};
use foundation_patrons::config::AppConfig;
use foundation_patrons::ports::PatronRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Configuration ──────────────────────────────────────────
    let config = AppConfig::load()?;
    init_tracing(&config);

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e.into());
    }
    info!(
        environment = ?config.server.environment,
        prefix = %config.api.prefix,
        "Starting Foundation Patrons API"
    );

    // ── Storage ────────────────────────────────────────────────
    let pool = if config.database.in_memory {
        info!("Using in-memory patron storage");
        None
    } else {
        Some(connect(&config).await?)
    };
    let repository: Arc<dyn PatronRepository> = match &pool {
        Some(pool) => Arc::new(PostgresPatronRepository::new(pool.clone())),
        None => Arc::new(InMemoryPatronRepository::new()),
    };

    // ── HTTP server ────────────────────────────────────────────
    let app = build_router(PatronAppState::new(repository), &config);
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
        info!("Database pool closed");
    }
    info!("Shutdown complete");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn connect(config: &AppConfig) -> Result<PgPool, Box<dyn std::error::Error>> {
    let db = &config.database;
    let pool = PgPoolOptions::new()
        .min_connections(db.min_connections)
        .max_connections(db.max_connections)
        .acquire_timeout(db.acquire_timeout())
        .idle_timeout(db.idle_timeout())
        .connect(&db.url)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;
    info!(max_connections = db.max_connections, "Database pool ready");

    if db.run_migrations {
        info!("Running database migrations...");
        run_migrations(&pool).await?;
        info!("Migrations completed");
    }

    Ok(pool)
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
