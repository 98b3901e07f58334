#![allow(dead_code)]

use devaluation_backend::config::RateProviderConfig;
use devaluation_backend::fx_client::ExchangeRateApiClient;
use devaluation_backend::models::*;
use devaluation_backend::repositories::*;
use devaluation_backend::AppState;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const RATES_PATH: &str = "/v6/latest/USD";

/// Repositories over a per-test database
pub struct TestDatabase {
    pub pool: PgPool,
    pub country_repo: Arc<CountryRepository>,
    pub history_repo: Arc<ExchangeRateHistoryRepository>,
    pub reference_country_repo: Arc<ReferenceCountryRepository>,
}

impl TestDatabase {
    /// Create TestDatabase from an existing pool (useful with sqlx::test)
    pub async fn from_pool(pool: PgPool) -> Self {
        Self {
            pool: pool.clone(),
            country_repo: Arc::new(CountryRepository::new(pool.clone())),
            history_repo: Arc::new(ExchangeRateHistoryRepository::new(pool.clone())),
            reference_country_repo: Arc::new(ReferenceCountryRepository::new(pool)),
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.pool.clone())
    }

    /// Clean up all test data
    pub async fn cleanup(&self) {
        sqlx::query("TRUNCATE TABLE exchange_rate_history, countries, reference_countries CASCADE")
            .execute(&self.pool)
            .await
            .expect("Failed to cleanup test data");
    }
}

pub fn decimal(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
}

/// Country fixture; the cost is split evenly over the four components
pub fn new_country(code: &str, currency: &str, monthly_cost: &str) -> NewCountry {
    let cost = decimal(monthly_cost);
    let quarter = cost / Decimal::from(4);

    NewCountry {
        code: code.to_string(),
        name: format!("Country {}", code),
        currency: currency.to_string(),
        flag: String::new(),
        continent: "america".to_string(),
        devaluation_vs_usd: Decimal::ZERO,
        big_mac_index: decimal("4.50"),
        monthly_living_cost: cost,
        rent_cost: quarter,
        food_cost: quarter,
        transport_cost: quarter,
        entertainment_cost: quarter,
        risk_level: "medium".to_string(),
        trend: "stable".to_string(),
        highlights: vec!["Coworking".to_string()],
    }
}

pub async fn create_test_country(db: &TestDatabase, code: &str, currency: &str) -> Country {
    db.country_repo
        .create(&new_country(code, currency, "800"))
        .await
        .expect("Failed to create test country")
}

pub async fn create_reference_country(db: &TestDatabase, code: &str, name: &str, cost: &str) {
    sqlx::query(
        r#"
        INSERT INTO reference_countries (code, name, currency, flag, avg_monthly_cost)
        VALUES ($1, $2, 'EUR', '', $3)
        "#,
    )
    .bind(code)
    .bind(name)
    .bind(decimal(cost))
    .execute(&db.pool)
    .await
    .expect("Failed to create reference country");
}

/// Mock FX provider answering `body` with `status`
pub async fn mock_fx_server(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(RATES_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;

    server
}

pub fn fx_client_for(server: &MockServer) -> ExchangeRateApiClient {
    let config = RateProviderConfig {
        url: format!("{}{}", server.uri(), RATES_PATH),
        timeout_secs: 5,
    };
    ExchangeRateApiClient::new(&config).expect("Failed to build FX client")
}
