use crate::error::RepositoryError;
use crate::models::ReferenceCountry;
use sqlx::PgPool;

/// Repository for reference (origin) countries
pub struct ReferenceCountryRepository {
    pool: PgPool,
}

impl ReferenceCountryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All reference countries ordered by name
    pub async fn find_all(&self) -> Result<Vec<ReferenceCountry>, RepositoryError> {
        let countries = sqlx::query_as::<_, ReferenceCountry>(
            r#"
            SELECT id, code, name, currency, flag, avg_monthly_cost
            FROM reference_countries
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(countries)
    }
}
