//! HTTP interface
//!
//! Exposes the ingestion trigger (compatible with the hosted-function path
//! the dashboard already calls) and the read endpoints the dashboard uses
//! for rankings, metrics and the budget calculator. Every response carries
//! permissive CORS headers and any `OPTIONS` request is answered directly.

use crate::error::{AppError, AppResult};
use crate::models::{Continent, Country, MonthlyRate, RiskLevel, Trend};
use crate::services::{
    cost_calculator, country_score, rank, IngestionSummary, MarketMetrics, OpportunityTier,
    RankingQuery, RateIngestionJob, SortMode,
};
use crate::AppState;
use actix_web::http::Method;
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, HttpRequest, HttpResponse};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info};
use uuid::Uuid;

pub const UPDATE_RATES_PATH: &str = "/functions/update-exchange-rates";

const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const DEFAULT_BUDGET: u32 = 2500;

/// CORS headers added to every response
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Headers", ALLOWED_HEADERS))
}

/// Register the ingestion trigger; needs `web::Data<RateIngestionJob>`
pub fn configure_ingestion(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(UPDATE_RATES_PATH)
            .route(web::method(Method::OPTIONS).to(preflight))
            .route(web::route().to(update_exchange_rates)),
    );
}

/// Register the read API; needs `web::Data<AppState>`
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .service(
            web::scope("/api")
                .route("/countries", web::get().to(list_countries))
                .route("/metrics", web::get().to(market_metrics))
                .route("/cost-calculator", web::get().to(calculate_costs))
                .route("/reference-countries", web::get().to(reference_countries)),
        );
}

/// Fallback: answers pre-flight for any path, 404 JSON otherwise
pub async fn fallback(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        return HttpResponse::Ok().finish();
    }

    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "error": format!("No route for {} {}", req.method(), req.path()),
    }))
}

async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[derive(Debug, Serialize)]
struct UpdateRatesResponse {
    success: bool,
    #[serde(flatten)]
    summary: IngestionSummary,
}

async fn update_exchange_rates(job: web::Data<RateIngestionJob>) -> AppResult<HttpResponse> {
    info!("Exchange rate update triggered over HTTP");

    let summary = job.run().await.map_err(|e| {
        error!("Error updating exchange rates: {}", e);
        e
    })?;

    Ok(HttpResponse::Ok().json(UpdateRatesResponse {
        success: true,
        summary,
    }))
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    match state.database.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })),
        Err(e) => {
            error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({ "status": "unavailable" }))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CountriesParams {
    pub continent: Option<String>,
    pub sort: Option<String>,
}

impl CountriesParams {
    /// `continent=all` (or absent) disables the filter
    pub fn into_query(self) -> AppResult<RankingQuery> {
        let continent = match self.continent.as_deref() {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(Continent::from_str(raw).map_err(AppError::Validation)?),
        };

        let sort = match self.sort.as_deref() {
            None | Some("") => SortMode::default(),
            Some(raw) => SortMode::from_str(raw).map_err(AppError::Validation)?,
        };

        Ok(RankingQuery { continent, sort })
    }
}

/// Country as served to the dashboard
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryView {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub currency: String,
    pub flag: String,
    pub continent: String,
    #[serde(rename = "devaluationVsUSD")]
    pub devaluation_vs_usd: Decimal,
    pub big_mac_index: Decimal,
    pub monthly_living_cost: Decimal,
    pub rent_cost: Decimal,
    pub food_cost: Decimal,
    pub transport_cost: Decimal,
    pub entertainment_cost: Decimal,
    pub risk_level: RiskLevel,
    pub trend: Trend,
    pub highlights: Vec<String>,
    pub historical_data: Vec<MonthlyRate>,
    pub opportunity_score: Decimal,
    pub opportunity_tier: OpportunityTier,
}

impl CountryView {
    pub fn new(country: Country, historical_data: Vec<MonthlyRate>) -> Self {
        let score = country_score(&country);
        let risk_level = country.risk_level_enum();
        let trend = country.trend_enum();

        Self {
            id: country.id,
            code: country.code,
            name: country.name,
            currency: country.currency,
            flag: country.flag,
            continent: country.continent,
            devaluation_vs_usd: country.devaluation_vs_usd,
            big_mac_index: country.big_mac_index,
            monthly_living_cost: country.monthly_living_cost,
            rent_cost: country.rent_cost,
            food_cost: country.food_cost,
            transport_cost: country.transport_cost,
            entertainment_cost: country.entertainment_cost,
            risk_level,
            trend,
            highlights: country.highlights,
            historical_data,
            opportunity_score: score,
            opportunity_tier: OpportunityTier::from_score(score),
        }
    }
}

/// Rank countries and attach their monthly history
pub fn build_country_views(
    countries: Vec<Country>,
    mut history: HashMap<Uuid, Vec<MonthlyRate>>,
    query: &RankingQuery,
) -> Vec<CountryView> {
    rank(countries, query)
        .into_iter()
        .map(|country| {
            let points = history.remove(&country.id).unwrap_or_default();
            CountryView::new(country, points)
        })
        .collect()
}

async fn list_countries(
    state: web::Data<AppState>,
    params: web::Query<CountriesParams>,
) -> AppResult<HttpResponse> {
    let query = params.into_inner().into_query()?;

    let countries = state.country_repo.find_all().await?;
    let history = state.history_repo.grouped_by_country().await?;

    Ok(HttpResponse::Ok().json(build_country_views(countries, history, &query)))
}

async fn market_metrics(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let countries = state.country_repo.find_all().await?;
    let metrics = MarketMetrics::compute(&countries)
        .ok_or_else(|| AppError::NotFound("No countries available".into()))?;

    Ok(HttpResponse::Ok().json(metrics))
}

#[derive(Debug, Deserialize)]
pub struct CostCalculatorParams {
    pub budget: Option<f64>,
}

impl CostCalculatorParams {
    pub fn budget(&self) -> AppResult<Decimal> {
        match self.budget {
            None => Ok(Decimal::from(DEFAULT_BUDGET)),
            Some(raw) => Decimal::from_f64(raw)
                .ok_or_else(|| AppError::Validation(format!("Invalid budget: {}", raw))),
        }
    }
}

async fn calculate_costs(
    state: web::Data<AppState>,
    params: web::Query<CostCalculatorParams>,
) -> AppResult<HttpResponse> {
    let budget = params.budget()?;
    let countries = state.country_repo.find_all().await?;

    Ok(HttpResponse::Ok().json(cost_calculator(budget, &countries)?))
}

async fn reference_countries(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let countries = state.reference_country_repo.find_all().await?;
    Ok(HttpResponse::Ok().json(countries))
}
