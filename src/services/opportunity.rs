//! Opportunity score: how attractive a destination is for someone earning
//! in USD. Rewards a strongly moved currency and a low cost of living.

use crate::models::{Continent, Country};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monthly cost (USD) at which the cost term contributes nothing
const COST_PIVOT: Decimal = Decimal::ONE_THOUSAND;

/// `|devaluation| * 0.5 + (1000 - monthly_cost) * 0.05`
pub fn opportunity_score(devaluation: Decimal, monthly_cost: Decimal) -> Decimal {
    let devaluation_weight = Decimal::new(5, 1);
    let cost_weight = Decimal::new(5, 2);

    devaluation.abs() * devaluation_weight + (COST_PIVOT - monthly_cost) * cost_weight
}

pub fn country_score(country: &Country) -> Decimal {
    opportunity_score(country.devaluation_vs_usd, country.monthly_living_cost)
}

/// Coarse banding of the score used for map colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityTier {
    High,
    MediumHigh,
    Medium,
    Low,
}

impl OpportunityTier {
    pub fn from_score(score: Decimal) -> Self {
        if score > Decimal::from(35) {
            OpportunityTier::High
        } else if score > Decimal::from(25) {
            OpportunityTier::MediumHigh
        } else if score > Decimal::from(15) {
            OpportunityTier::Medium
        } else {
            OpportunityTier::Low
        }
    }
}

/// Highest score first; ties keep their input order
pub fn sort_by_opportunity(mut countries: Vec<Country>) -> Vec<Country> {
    countries.sort_by(|a, b| country_score(b).cmp(&country_score(a)));
    countries
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Descending opportunity score
    #[default]
    Opportunity,
    /// Ascending signed devaluation
    Devaluation,
    /// Ascending monthly living cost
    Cost,
}

impl SortMode {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "opportunity" => Ok(SortMode::Opportunity),
            "devaluation" => Ok(SortMode::Devaluation),
            "cost" => Ok(SortMode::Cost),
            _ => Err(format!("Invalid sort mode: {}", s)),
        }
    }
}

/// Filter + order for the country ranking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankingQuery {
    /// `None` keeps every continent
    pub continent: Option<Continent>,
    pub sort: SortMode,
}

pub fn rank(countries: Vec<Country>, query: &RankingQuery) -> Vec<Country> {
    let mut filtered: Vec<Country> = match query.continent {
        Some(continent) => countries
            .into_iter()
            .filter(|c| c.continent.eq_ignore_ascii_case(continent.as_str()))
            .collect(),
        None => countries,
    };

    match query.sort {
        SortMode::Opportunity => sort_by_opportunity(filtered),
        SortMode::Devaluation => {
            filtered.sort_by_key(|c| c.devaluation_vs_usd);
            filtered
        }
        SortMode::Cost => {
            filtered.sort_by_key(|c| c.monthly_living_cost);
            filtered
        }
    }
}
