//! Domain models for the devaluation backend.
//!
//! This module contains the database-backed entities: destination
//! countries, their monthly rate history, and reference origin countries.

pub mod country;
pub mod exchange_rate_history;
pub mod reference_country;

// Re-export all models for convenient access
pub use country::{Continent, Country, RiskLevel, TrackedCountry, Trend};
pub use exchange_rate_history::{ExchangeRateHistoryPoint, MonthlyRate};
pub use reference_country::ReferenceCountry;
