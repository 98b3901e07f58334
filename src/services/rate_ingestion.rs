//! Exchange-rate ingestion: fetch current quotes, compute each tracked
//! country's devaluation against its baseline, persist the value and a
//! monthly history point.
//!
//! A country whose currency, current rate, or baseline cannot be resolved is
//! skipped; a write failure on one country never blocks the others. Only a
//! failed fetch or a failed country load aborts the run.

use crate::baseline::BaselineTable;
use crate::error::{AppResult, RepositoryError};
use crate::fx_client::{LatestRates, RateProvider};
use crate::models::TrackedCountry;
use crate::repositories::{CountryRepository, ExchangeRateHistoryRepository};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

const MONTH_LABELS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sept", "Oct", "Nov", "Dic",
];

/// History bucket label for a timestamp: abbreviated Spanish month name
/// (es-ES short form, so September is "Sept")
pub fn month_label(at: DateTime<Utc>) -> &'static str {
    MONTH_LABELS[at.month0() as usize]
}

/// `((current - baseline) / baseline) * 100`, rounded to one decimal place
///
/// Positive means the currency buys more units per USD than at baseline,
/// i.e. it has weakened. Returns `None` for a non-positive baseline or when
/// the result does not fit in a `Decimal`.
pub fn compute_devaluation(current: Decimal, baseline: Decimal) -> Option<Decimal> {
    if baseline <= Decimal::ZERO {
        return None;
    }

    let change = current
        .checked_sub(baseline)?
        .checked_div(baseline)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    Some(change.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

/// Persistence the ingestion job needs
#[async_trait]
pub trait RateStore: Send + Sync {
    async fn tracked_countries(&self) -> Result<Vec<TrackedCountry>, RepositoryError>;

    async fn update_devaluation(
        &self,
        country_id: Uuid,
        devaluation: Decimal,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// Insert or overwrite the `(country_id, month)` history row
    async fn upsert_history(
        &self,
        country_id: Uuid,
        month: &str,
        rate: Decimal,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
}

/// Postgres-backed [`RateStore`]
pub struct PgRateStore {
    country_repo: Arc<CountryRepository>,
    history_repo: Arc<ExchangeRateHistoryRepository>,
}

impl PgRateStore {
    pub fn new(
        country_repo: Arc<CountryRepository>,
        history_repo: Arc<ExchangeRateHistoryRepository>,
    ) -> Self {
        Self {
            country_repo,
            history_repo,
        }
    }
}

#[async_trait]
impl RateStore for PgRateStore {
    async fn tracked_countries(&self) -> Result<Vec<TrackedCountry>, RepositoryError> {
        self.country_repo.find_tracked().await
    }

    async fn update_devaluation(
        &self,
        country_id: Uuid,
        devaluation: Decimal,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.country_repo
            .update_devaluation(country_id, devaluation, at)
            .await
    }

    async fn upsert_history(
        &self,
        country_id: Uuid,
        month: &str,
        rate: Decimal,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.history_repo
            .upsert(country_id, month, rate, at)
            .await
            .map(|_| ())
    }
}

/// New devaluation computed for one country
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRateUpdate {
    pub id: Uuid,
    pub devaluation: Decimal,
    pub rate: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteStage {
    Devaluation,
    History,
}

/// A per-country write that failed without aborting the run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteFailure {
    pub id: Uuid,
    pub stage: WriteStage,
    pub error: String,
}

/// Outcome of one ingestion run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionSummary {
    pub updated_at: DateTime<Utc>,
    pub month: String,
    pub countries_updated: usize,
    pub rates: Vec<CountryRateUpdate>,
    pub failures: Vec<WriteFailure>,
}

pub struct RateIngestionJob {
    provider: Arc<dyn RateProvider>,
    store: Arc<dyn RateStore>,
    baselines: Arc<BaselineTable>,
}

impl RateIngestionJob {
    pub fn new(
        provider: Arc<dyn RateProvider>,
        store: Arc<dyn RateStore>,
        baselines: Arc<BaselineTable>,
    ) -> Self {
        Self {
            provider,
            store,
            baselines,
        }
    }

    /// Run the job against the current wall clock
    pub async fn run(&self) -> AppResult<IngestionSummary> {
        self.run_at(Utc::now()).await
    }

    /// Run the job as if it were `now`
    #[instrument(name = "RateIngestion", skip(self), fields(month = month_label(now)))]
    pub async fn run_at(&self, now: DateTime<Utc>) -> AppResult<IngestionSummary> {
        let latest = self.provider.fetch_latest().await?;
        let countries = self.store.tracked_countries().await?;
        let month = month_label(now);

        let updates = self.compute_updates(&countries, &latest);
        info!("Updating {} of {} countries", updates.len(), countries.len());

        let mut failures = Vec::new();
        for update in &updates {
            if let Err(e) = self
                .store
                .update_devaluation(update.id, update.devaluation, now)
                .await
            {
                error!("Failed to update country {}: {}", update.id, e);
                failures.push(WriteFailure {
                    id: update.id,
                    stage: WriteStage::Devaluation,
                    error: e.to_string(),
                });
            }

            if let Err(e) = self
                .store
                .upsert_history(update.id, month, update.rate, now)
                .await
            {
                error!("Failed to record history for {}: {}", update.id, e);
                failures.push(WriteFailure {
                    id: update.id,
                    stage: WriteStage::History,
                    error: e.to_string(),
                });
            }
        }

        let summary = IngestionSummary {
            updated_at: now,
            month: month.to_string(),
            countries_updated: updates.len(),
            rates: updates,
            failures,
        };

        info!(
            countries_updated = summary.countries_updated,
            failures = summary.failures.len(),
            "Exchange rate update complete"
        );

        Ok(summary)
    }

    fn compute_updates(
        &self,
        countries: &[TrackedCountry],
        latest: &LatestRates,
    ) -> Vec<CountryRateUpdate> {
        countries
            .iter()
            .filter_map(|country| self.compute_update(country, latest))
            .collect()
    }

    fn compute_update(
        &self,
        country: &TrackedCountry,
        latest: &LatestRates,
    ) -> Option<CountryRateUpdate> {
        let Some(currency) = self.baselines.currency_for(&country.code) else {
            info!("No currency mapped for {}", country.code);
            return None;
        };

        let Some(rate) = latest.rate_for(currency) else {
            info!("No rate found for {} ({})", country.code, currency);
            return None;
        };

        let Some(baseline) = self.baselines.baseline_for(currency) else {
            info!("No baseline rate for {}", currency);
            return None;
        };

        let Some(devaluation) = compute_devaluation(rate, baseline) else {
            info!(
                "Devaluation out of range for {} ({}): rate {}, baseline {}",
                country.code, currency, rate, baseline
            );
            return None;
        };

        Some(CountryRateUpdate {
            id: country.id,
            devaluation,
            rate,
        })
    }
}
