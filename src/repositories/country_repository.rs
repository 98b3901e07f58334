//! Repository for destination countries

use crate::error::RepositoryError;
use crate::models::{Country, TrackedCountry};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const COUNTRY_COLUMNS: &str = r#"
    id,
    code,
    name,
    currency,
    flag,
    continent,
    devaluation_vs_usd,
    big_mac_index,
    monthly_living_cost,
    rent_cost,
    food_cost,
    transport_cost,
    entertainment_cost,
    risk_level,
    trend,
    highlights,
    created_at,
    updated_at
"#;

/// Fields needed to insert a country (seeding and tests)
#[derive(Debug, Clone)]
pub struct NewCountry {
    pub code: String,
    pub name: String,
    pub currency: String,
    pub flag: String,
    pub continent: String,
    pub devaluation_vs_usd: Decimal,
    pub big_mac_index: Decimal,
    pub monthly_living_cost: Decimal,
    pub rent_cost: Decimal,
    pub food_cost: Decimal,
    pub transport_cost: Decimal,
    pub entertainment_cost: Decimal,
    pub risk_level: String,
    pub trend: String,
    pub highlights: Vec<String>,
}

/// Repository for country data access
pub struct CountryRepository {
    pool: PgPool,
}

impl CountryRepository {
    /// Create a new CountryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new country
    pub async fn create(&self, country: &NewCountry) -> Result<Country, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO countries (
                code, name, currency, flag, continent, devaluation_vs_usd, big_mac_index,
                monthly_living_cost, rent_cost, food_cost, transport_cost, entertainment_cost,
                risk_level, trend, highlights
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {COUNTRY_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Country>(&sql)
            .bind(&country.code)
            .bind(&country.name)
            .bind(&country.currency)
            .bind(&country.flag)
            .bind(&country.continent)
            .bind(country.devaluation_vs_usd)
            .bind(country.big_mac_index)
            .bind(country.monthly_living_cost)
            .bind(country.rent_cost)
            .bind(country.food_cost)
            .bind(country.transport_cost)
            .bind(country.entertainment_cost)
            .bind(&country.risk_level)
            .bind(&country.trend)
            .bind(&country.highlights)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// Find a country by UUID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Country>, RepositoryError> {
        let sql = format!("SELECT {COUNTRY_COLUMNS} FROM countries WHERE id = $1");

        let country = sqlx::query_as::<_, Country>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(country)
    }

    /// All countries, full records, least devalued first
    pub async fn find_all(&self) -> Result<Vec<Country>, RepositoryError> {
        let sql = format!(
            "SELECT {COUNTRY_COLUMNS} FROM countries ORDER BY devaluation_vs_usd ASC, code ASC"
        );

        let countries = sqlx::query_as::<_, Country>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(countries)
    }

    /// The identity and currency of every country, for rate ingestion
    pub async fn find_tracked(&self) -> Result<Vec<TrackedCountry>, RepositoryError> {
        let countries = sqlx::query_as::<_, TrackedCountry>(
            r#"
            SELECT id, code, currency, devaluation_vs_usd
            FROM countries
            ORDER BY code ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(countries)
    }

    /// Overwrite a country's devaluation and bump its `updated_at`
    pub async fn update_devaluation(
        &self,
        id: Uuid,
        devaluation: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE countries
            SET devaluation_vs_usd = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(devaluation)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("country {}", id)));
        }

        Ok(())
    }
}
