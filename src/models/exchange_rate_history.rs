use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One month of rate history for a country
///
/// `(country_id, month)` is unique; re-recording a month overwrites the rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ExchangeRateHistoryPoint {
    pub id: Uuid,
    pub country_id: Uuid,
    pub month: String,
    pub rate: Decimal,
    pub recorded_at: DateTime<Utc>,
}

/// Chart-ready `(month, rate)` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRate {
    pub month: String,
    pub rate: Decimal,
}

impl From<&ExchangeRateHistoryPoint> for MonthlyRate {
    fn from(point: &ExchangeRateHistoryPoint) -> Self {
        Self {
            month: point.month.clone(),
            rate: point.rate,
        }
    }
}
