//! In-memory doubles for service and handler tests.

use crate::error::{FetchError, RepositoryError};
use crate::fx_client::{LatestRates, RateProvider};
use crate::models::{Country, TrackedCountry};
use crate::services::rate_ingestion::RateStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

pub fn tracked(code: &str, currency: &str) -> TrackedCountry {
    TrackedCountry {
        id: Uuid::new_v4(),
        code: code.to_string(),
        currency: currency.to_string(),
        devaluation_vs_usd: Decimal::ZERO,
    }
}

/// A full country record; the cost is split evenly over the four components
pub fn sample_country(code: &str, devaluation: &str, monthly_cost: &str) -> Country {
    let cost: Decimal = monthly_cost.parse().unwrap();
    let quarter = cost / Decimal::from(4);
    let now = Utc::now();

    Country {
        id: Uuid::new_v4(),
        code: code.to_string(),
        name: code.to_string(),
        currency: format!("{code}X"),
        flag: String::new(),
        continent: "america".to_string(),
        devaluation_vs_usd: devaluation.parse().unwrap(),
        big_mac_index: Decimal::new(400, 2),
        monthly_living_cost: cost,
        rent_cost: quarter,
        food_cost: quarter,
        transport_cost: quarter,
        entertainment_cost: quarter,
        risk_level: "medium".to_string(),
        trend: "stable".to_string(),
        highlights: vec![],
        created_at: now,
        updated_at: now,
    }
}

enum StubResponse {
    Rates(LatestRates),
    Status(u16),
}

pub struct StubRateProvider {
    response: StubResponse,
}

impl StubRateProvider {
    pub fn rates(latest: LatestRates) -> Self {
        Self {
            response: StubResponse::Rates(latest),
        }
    }

    pub fn status(code: u16) -> Self {
        Self {
            response: StubResponse::Status(code),
        }
    }
}

#[async_trait]
impl RateProvider for StubRateProvider {
    async fn fetch_latest(&self) -> Result<LatestRates, FetchError> {
        match &self.response {
            StubResponse::Rates(latest) => Ok(latest.clone()),
            StubResponse::Status(code) => Err(FetchError::Status(*code)),
        }
    }
}

#[derive(Default)]
struct StoreState {
    countries: Vec<TrackedCountry>,
    history: HashMap<(Uuid, String), (Decimal, DateTime<Utc>)>,
    writes: usize,
}

/// [`RateStore`] over plain maps, with the same one-row-per-month semantics
#[derive(Default)]
pub struct InMemoryRateStore {
    state: Mutex<StoreState>,
    failing_updates: HashSet<Uuid>,
    failing_history: HashSet<Uuid>,
}

impl InMemoryRateStore {
    pub fn with_countries(countries: Vec<TrackedCountry>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                countries,
                ..StoreState::default()
            }),
            failing_updates: HashSet::new(),
            failing_history: HashSet::new(),
        }
    }

    /// Make devaluation updates for `id` fail
    pub fn failing_updates_for(mut self, id: Uuid) -> Self {
        self.failing_updates.insert(id);
        self
    }

    /// Make history upserts for `id` fail
    pub fn failing_history_for(mut self, id: Uuid) -> Self {
        self.failing_history.insert(id);
        self
    }

    pub fn devaluation_of(&self, id: Uuid) -> Option<Decimal> {
        let state = self.state.lock().unwrap();
        state
            .countries
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.devaluation_vs_usd)
    }

    /// `(month, rate)` rows for a country, ordered by record time
    pub fn history_of(&self, id: Uuid) -> Vec<(String, Decimal)> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<(DateTime<Utc>, String, Decimal)> = state
            .history
            .iter()
            .filter(|((country_id, _), _)| *country_id == id)
            .map(|((_, month), (rate, at))| (*at, month.clone(), *rate))
            .collect();
        rows.sort_by_key(|(at, _, _)| *at);
        rows.into_iter().map(|(_, month, rate)| (month, rate)).collect()
    }

    /// Successful writes of either kind
    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().writes
    }
}

#[async_trait]
impl RateStore for InMemoryRateStore {
    async fn tracked_countries(&self) -> Result<Vec<TrackedCountry>, RepositoryError> {
        Ok(self.state.lock().unwrap().countries.clone())
    }

    async fn update_devaluation(
        &self,
        country_id: Uuid,
        devaluation: Decimal,
        _at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        if self.failing_updates.contains(&country_id) {
            return Err(RepositoryError::NotFound(format!("country {}", country_id)));
        }

        let mut state = self.state.lock().unwrap();
        let country = state
            .countries
            .iter_mut()
            .find(|c| c.id == country_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("country {}", country_id)))?;
        country.devaluation_vs_usd = devaluation;
        state.writes += 1;
        Ok(())
    }

    async fn upsert_history(
        &self,
        country_id: Uuid,
        month: &str,
        rate: Decimal,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        if self.failing_history.contains(&country_id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "history for {}",
                country_id
            )));
        }

        let mut state = self.state.lock().unwrap();
        state
            .history
            .insert((country_id, month.to_string()), (rate, at));
        state.writes += 1;
        Ok(())
    }
}
