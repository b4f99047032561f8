//! Fitness Progress Backend
//!
//! Tracks workouts, body metrics and goals per user and serves the derived
//! streaks, weekly stats, schedule and charts.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: the progress facade (validation, recomputation, persistence)
//! - Repositories: progress and profile stores (PostgreSQL or in-memory)
//! - Shared crate: pure calendar, streak, stats and schedule logic

use anyhow::Result;
use fitness_progress_backend::{
    config::{self, StorageBackend},
    db,
    repositories::{
        MemoryProfileStore, MemoryProgressStore, PgProfileStore, PgProgressStore, ProfileStore,
        ProgressStore,
    },
    routes,
    state::AppState,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        storage = ?config.storage.backend,
        utc_offset_minutes = config.progress.utc_offset_minutes,
        "Starting Fitness Progress Backend"
    );

    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let (progress_store, profile_store) = create_stores(&config).await?;
    let state = AppState::new(progress_store, profile_store, config.clone());

    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Build the configured progress and profile stores
async fn create_stores(
    config: &config::AppConfig,
) -> Result<(Arc<dyn ProgressStore>, Arc<dyn ProfileStore>)> {
    match config.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; progress is lost on restart");
            let progress: Arc<dyn ProgressStore> = Arc::new(MemoryProgressStore::new());
            let profiles: Arc<dyn ProfileStore> = Arc::new(MemoryProfileStore::new());
            Ok((progress, profiles))
        }
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let pool = db::create_pool(&config.database).await?;

            // Production runs migrations as a separate job
            if !config::AppConfig::is_production() {
                db::run_migrations(&pool).await?;
            }

            let progress: Arc<dyn ProgressStore> = Arc::new(PgProgressStore::new(pool.clone()));
            let profiles: Arc<dyn ProfileStore> = Arc::new(PgProfileStore::new(pool));
            Ok((progress, profiles))
        }
    }
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "fitness_progress_backend=info,tower_http=info".into()
        } else {
            "fitness_progress_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for log aggregation
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.jwt.secret.contains("development") || config.jwt.secret.len() < 32 {
        errors.push("JWT secret must be at least 32 characters and not contain 'development'");
    }

    if config.storage.backend == StorageBackend::Memory {
        errors.push("In-memory storage is not allowed in production");
    }

    if config.progress.utc_offset_minutes.unsigned_abs() >= 24 * 60 {
        errors.push("progress.utc_offset_minutes must be within one day of UTC");
    }

    if config.database.url.contains("localhost") || config.database.url.contains("127.0.0.1") {
        warn!("Database URL contains localhost - ensure this is intentional for production");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
