//! Repository for monthly exchange-rate history

use crate::error::RepositoryError;
use crate::models::{ExchangeRateHistoryPoint, MonthlyRate};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

pub struct ExchangeRateHistoryRepository {
    pool: PgPool,
}

impl ExchangeRateHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record the rate for `(country_id, month)`, overwriting an existing row
    pub async fn upsert(
        &self,
        country_id: Uuid,
        month: &str,
        rate: Decimal,
        recorded_at: DateTime<Utc>,
    ) -> Result<ExchangeRateHistoryPoint, RepositoryError> {
        let point = sqlx::query_as::<_, ExchangeRateHistoryPoint>(
            r#"
            INSERT INTO exchange_rate_history (country_id, month, rate, recorded_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (country_id, month)
            DO UPDATE SET rate = EXCLUDED.rate, recorded_at = EXCLUDED.recorded_at
            RETURNING id, country_id, month, rate, recorded_at
            "#,
        )
        .bind(country_id)
        .bind(month)
        .bind(rate)
        .bind(recorded_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(point)
    }

    /// History for one country, oldest first
    pub async fn find_by_country(
        &self,
        country_id: Uuid,
    ) -> Result<Vec<ExchangeRateHistoryPoint>, RepositoryError> {
        let points = sqlx::query_as::<_, ExchangeRateHistoryPoint>(
            r#"
            SELECT id, country_id, month, rate, recorded_at
            FROM exchange_rate_history
            WHERE country_id = $1
            ORDER BY recorded_at ASC
            "#,
        )
        .bind(country_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(points)
    }

    /// Every history row, oldest first
    pub async fn find_all(&self) -> Result<Vec<ExchangeRateHistoryPoint>, RepositoryError> {
        let points = sqlx::query_as::<_, ExchangeRateHistoryPoint>(
            r#"
            SELECT id, country_id, month, rate, recorded_at
            FROM exchange_rate_history
            ORDER BY recorded_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(points)
    }

    /// Every history row bucketed by country, preserving chronological order
    pub async fn grouped_by_country(
        &self,
    ) -> Result<HashMap<Uuid, Vec<MonthlyRate>>, RepositoryError> {
        let points = self.find_all().await?;
        Ok(group_by_country(&points))
    }
}

pub fn group_by_country(points: &[ExchangeRateHistoryPoint]) -> HashMap<Uuid, Vec<MonthlyRate>> {
    let mut grouped: HashMap<Uuid, Vec<MonthlyRate>> = HashMap::new();
    for point in points {
        grouped
            .entry(point.country_id)
            .or_default()
            .push(MonthlyRate::from(point));
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(country_id: Uuid, month: &str, rate: i64, day: u32) -> ExchangeRateHistoryPoint {
        ExchangeRateHistoryPoint {
            id: Uuid::new_v4(),
            country_id,
            month: month.to_string(),
            rate: Decimal::new(rate, 0),
            recorded_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_group_by_country_keeps_order() {
        let ar = Uuid::new_v4();
        let tr = Uuid::new_v4();
        let points = vec![
            point(ar, "Ene", 800, 1),
            point(tr, "Ene", 30, 2),
            point(ar, "Feb", 830, 3),
        ];

        let grouped = group_by_country(&points);
        assert_eq!(grouped.len(), 2);

        let months: Vec<&str> = grouped[&ar].iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["Ene", "Feb"]);
        assert_eq!(grouped[&tr][0].rate, Decimal::new(30, 0));
    }
}
