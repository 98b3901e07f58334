//! Devaluation Backend Library
//!
//! This module exposes the backend components for use by the binary and tests.

pub mod baseline;
pub mod config;
pub mod database;
pub mod error;
pub mod fx_client;
pub mod http_service;
pub mod logging;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use database::Database;
use repositories::*;
use std::sync::Arc;

/// Application state containing the database handle and repositories
pub struct AppState {
    pub database: Database,
    pub country_repo: Arc<CountryRepository>,
    pub history_repo: Arc<ExchangeRateHistoryRepository>,
    pub reference_country_repo: Arc<ReferenceCountryRepository>,
}

impl AppState {
    /// Create a new AppState with initialized repositories
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            database: Database::new(pool.clone()),
            country_repo: Arc::new(CountryRepository::new(pool.clone())),
            history_repo: Arc::new(ExchangeRateHistoryRepository::new(pool.clone())),
            reference_country_repo: Arc::new(ReferenceCountryRepository::new(pool)),
        }
    }

    /// Rate store backed by this state's repositories
    pub fn rate_store(&self) -> services::PgRateStore {
        services::PgRateStore::new(self.country_repo.clone(), self.history_repo.clone())
    }
}
