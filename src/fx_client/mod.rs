//! Outbound client for the foreign-exchange rate provider.

mod exchange_rate_api;

pub use exchange_rate_api::ExchangeRateApiClient;

use crate::error::FetchError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Latest quotes, keyed by three-letter currency code, units per 1 USD
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestRates {
    pub base_code: String,
    pub rates: HashMap<String, Decimal>,
}

impl LatestRates {
    pub fn rate_for(&self, currency: &str) -> Option<Decimal> {
        self.rates.get(&currency.to_uppercase()).copied()
    }
}

/// Source of current exchange rates
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<LatestRates, FetchError>;
}
