//! Devaluation Backend Service
//!
//! Main entry point for the devaluation tracker backend.
//! This service provides:
//! - HTTP trigger for the exchange-rate ingestion job
//! - Read API for rankings, metrics and the budget calculator
//! - Optional background task that runs the ingestion job periodically

use actix_web::{web, App, HttpServer};
use devaluation_backend::baseline::BaselineTable;
use devaluation_backend::config::AppConfig;
use devaluation_backend::database::{create_pool, run_migrations};
use devaluation_backend::error::{AppError, AppResult};
use devaluation_backend::fx_client::ExchangeRateApiClient;
use devaluation_backend::http_service;
use devaluation_backend::logging::init_logging;
use devaluation_backend::services::{RateIngestionJob, RateScheduler};
use devaluation_backend::AppState;
use std::sync::Arc;
use tracing::{error, info, warn};

#[actix_web::main]
async fn main() -> AppResult<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    init_logging(&config);

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           Devaluation Backend Starting                    ║");
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);
    info!("HTTP port: {}", config.http_port);
    info!("FX provider: {}", config.rate_provider.url);

    // =========================================================================
    // DATABASE SETUP
    // =========================================================================
    info!("Connecting to database...");

    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to create database pool: {}", e);
        AppError::Database(e)
    })?;

    info!("Database connection pool created successfully");
    info!("Max connections: {}", config.database.max_connections);

    info!("Running database migrations...");
    run_migrations(&pool, None).await.map_err(|e| {
        error!("Database migration failed: {}", e);
        AppError::Database(e)
    })?;

    info!("Database migrations completed successfully");

    // =========================================================================
    // CORE SERVICES INITIALIZATION
    // =========================================================================
    info!("Initializing core services...");

    let app_state = web::Data::new(AppState::new(pool));
    info!("✓ Application state initialized with repositories");

    let baselines = BaselineTable::load(config.baseline_rates_path.as_deref())?;
    match &config.baseline_rates_path {
        Some(path) => info!("✓ Baseline rates loaded from {}", path.display()),
        None => info!("✓ Built-in baseline rates loaded"),
    }
    info!(
        "  {} countries mapped, {} currencies with a baseline",
        baselines.country_count(),
        baselines.currency_count()
    );

    let fx_client = ExchangeRateApiClient::new(&config.rate_provider).map_err(|e| {
        error!("Failed to build FX client: {}", e);
        AppError::Fetch(e)
    })?;
    info!("✓ FX client initialized");

    let job = Arc::new(RateIngestionJob::new(
        Arc::new(fx_client),
        Arc::new(app_state.rate_store()),
        Arc::new(baselines),
    ));
    info!("✓ Rate ingestion job initialized");

    // =========================================================================
    // BACKGROUND TASKS
    // =========================================================================
    match config.scheduler.interval() {
        Some(interval) => {
            let scheduler = RateScheduler::new(job.clone(), interval);
            tokio::spawn(async move {
                scheduler.start().await;
            });
            info!("✓ Rate scheduler started ({:?} interval)", interval);
        }
        None => warn!("RATE_UPDATE_INTERVAL_SECS not configured - rates update on HTTP trigger only"),
    }

    // =========================================================================
    // START SERVER
    // =========================================================================
    let job_data = web::Data::from(job);
    let bind_addr = ("0.0.0.0", config.http_port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(job_data.clone())
            .wrap(http_service::cors_headers())
            .configure(http_service::configure_ingestion)
            .configure(http_service::configure_api)
            .default_service(web::to(http_service::fallback))
    })
    .bind(bind_addr)
    .map_err(|e| AppError::Message(format!("Failed to bind HTTP server: {}", e)))?
    .run();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           Devaluation Backend Ready!                      ║");
    info!("╠══════════════════════════════════════════════════════════╣");
    info!("║  HTTP API:     0.0.0.0:{}                               ║", config.http_port);
    info!("║  Environment:  {}                                    ║", config.environment);
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Press Ctrl+C to shutdown gracefully");

    server
        .await
        .map_err(|e| AppError::Message(format!("HTTP server error: {}", e)))?;

    info!("Devaluation backend shutdown complete");
    Ok(())
}
