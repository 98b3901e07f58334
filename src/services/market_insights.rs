//! Aggregates over the country table: headline metrics and the budget
//! calculator.

use crate::error::{AppError, AppResult};
use crate::models::{Continent, Country, RiskLevel};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use uuid::Uuid;

const BIG_MAC_ENTRIES: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryHighlight {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub flag: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskBucket {
    pub level: RiskLevel,
    pub count: usize,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinentBucket {
    pub continent: Continent,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BigMacEntry {
    pub code: String,
    pub name: String,
    pub flag: String,
    pub big_mac_index: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMetrics {
    pub country_count: usize,
    pub average_devaluation: Decimal,
    pub average_monthly_cost: Decimal,
    pub cheapest: CountryHighlight,
    /// Largest positive devaluation, i.e. the most weakened currency
    pub most_devalued: CountryHighlight,
    pub risk_distribution: Vec<RiskBucket>,
    pub continent_distribution: Vec<ContinentBucket>,
    /// Lowest Big Mac prices first
    pub big_mac_comparison: Vec<BigMacEntry>,
}

impl MarketMetrics {
    /// `None` when there are no countries to aggregate
    pub fn compute(countries: &[Country]) -> Option<Self> {
        let cheapest = countries.iter().min_by_key(|c| c.monthly_living_cost)?;
        let most_devalued = countries.iter().max_by_key(|c| c.devaluation_vs_usd)?;

        let count = Decimal::from(countries.len());
        let total_devaluation: Decimal = countries.iter().map(|c| c.devaluation_vs_usd).sum();
        let total_cost: Decimal = countries.iter().map(|c| c.monthly_living_cost).sum();

        let risk_distribution = RiskLevel::ALL
            .iter()
            .map(|level| {
                let matching = countries
                    .iter()
                    .filter(|c| c.risk_level_enum() == *level)
                    .count();
                RiskBucket {
                    level: *level,
                    count: matching,
                    percentage: round(Decimal::from(matching) / count * Decimal::ONE_HUNDRED, 1),
                }
            })
            .collect();

        let continent_distribution = Continent::ALL
            .iter()
            .map(|continent| ContinentBucket {
                continent: *continent,
                count: countries
                    .iter()
                    .filter(|c| c.continent_enum() == Some(*continent))
                    .count(),
            })
            .collect();

        let mut by_big_mac: Vec<&Country> = countries.iter().collect();
        by_big_mac.sort_by_key(|c| c.big_mac_index);
        let big_mac_comparison = by_big_mac
            .into_iter()
            .take(BIG_MAC_ENTRIES)
            .map(|c| BigMacEntry {
                code: c.code.clone(),
                name: c.name.clone(),
                flag: c.flag.clone(),
                big_mac_index: c.big_mac_index,
            })
            .collect();

        Some(Self {
            country_count: countries.len(),
            average_devaluation: round(total_devaluation / count, 1),
            average_monthly_cost: round(total_cost / count, 2),
            cheapest: highlight(cheapest, cheapest.monthly_living_cost),
            most_devalued: highlight(most_devalued, most_devalued.devaluation_vs_usd),
            risk_distribution,
            continent_distribution,
            big_mac_comparison,
        })
    }
}

/// How far a monthly budget stretches in one destination
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostComparison {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub flag: String,
    pub monthly_living_cost: Decimal,
    pub months_affordable: i64,
    pub savings_per_month: Decimal,
    pub purchasing_power_multiplier: Decimal,
}

/// Compare `budget` (USD per month) against every destination, best first.
/// Destinations without a positive cost are left out.
pub fn cost_calculator(budget: Decimal, countries: &[Country]) -> AppResult<Vec<CostComparison>> {
    if budget <= Decimal::ZERO {
        return Err(AppError::Validation("Budget must be greater than 0".into()));
    }

    let mut rows: Vec<CostComparison> = countries
        .iter()
        .filter(|c| c.monthly_living_cost > Decimal::ZERO)
        .map(|c| {
            let ratio = budget / c.monthly_living_cost;
            CostComparison {
                id: c.id,
                code: c.code.clone(),
                name: c.name.clone(),
                flag: c.flag.clone(),
                monthly_living_cost: c.monthly_living_cost,
                months_affordable: ratio.floor().to_i64().unwrap_or(i64::MAX),
                savings_per_month: budget - c.monthly_living_cost,
                purchasing_power_multiplier: round(ratio, 2),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.purchasing_power_multiplier.cmp(&a.purchasing_power_multiplier));
    Ok(rows)
}

fn highlight(country: &Country, value: Decimal) -> CountryHighlight {
    CountryHighlight {
        id: country.id,
        code: country.code.clone(),
        name: country.name.clone(),
        flag: country.flag.clone(),
        value,
    }
}

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::sample_country;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_metrics_empty() {
        assert!(MarketMetrics::compute(&[]).is_none());
    }

    #[test]
    fn test_metrics_aggregates() {
        let mut ar = sample_country("AR", "80", "700");
        ar.risk_level = "high".into();
        ar.big_mac_index = d("5.20");
        let mut pl = sample_country("PL", "-3", "1100");
        pl.continent = "europe".into();
        pl.risk_level = "low".into();
        pl.big_mac_index = d("4.10");
        let br = sample_country("BR", "12", "650");

        let metrics = MarketMetrics::compute(&[ar, pl, br]).unwrap();

        assert_eq!(metrics.country_count, 3);
        assert_eq!(metrics.average_devaluation, d("29.7"));
        assert_eq!(metrics.average_monthly_cost, d("816.67"));
        assert_eq!(metrics.cheapest.code, "BR");
        assert_eq!(metrics.most_devalued.code, "AR");
        assert_eq!(metrics.most_devalued.value, d("80"));

        let high = metrics
            .risk_distribution
            .iter()
            .find(|b| b.level == RiskLevel::High)
            .unwrap();
        assert_eq!(high.count, 1);
        assert_eq!(high.percentage, d("33.3"));

        let america = metrics
            .continent_distribution
            .iter()
            .find(|b| b.continent == Continent::America)
            .unwrap();
        assert_eq!(america.count, 2);

        let big_mac: Vec<&str> = metrics
            .big_mac_comparison
            .iter()
            .map(|e| e.code.as_str())
            .collect();
        assert_eq!(big_mac, vec!["BR", "PL", "AR"]);
    }

    #[test]
    fn test_cost_calculator() {
        let countries = vec![
            sample_country("AR", "80", "800"),
            sample_country("TH", "5", "1000"),
            sample_country("VN", "3", "600"),
            sample_country("XX", "0", "0"),
        ];

        let rows = cost_calculator(d("2500"), &countries).unwrap();

        let order: Vec<&str> = rows.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(order, vec!["VN", "AR", "TH"]);

        let vn = &rows[0];
        assert_eq!(vn.months_affordable, 4);
        assert_eq!(vn.savings_per_month, d("1900"));
        assert_eq!(vn.purchasing_power_multiplier, d("4.17"));

        let th = &rows[2];
        assert_eq!(th.months_affordable, 2);
        assert_eq!(th.purchasing_power_multiplier, d("2.5"));
    }

    #[test]
    fn test_cost_calculator_negative_savings() {
        let rows = cost_calculator(d("500"), &[sample_country("CH", "0", "800")]).unwrap();
        assert_eq!(rows[0].months_affordable, 0);
        assert_eq!(rows[0].savings_per_month, d("-300"));
    }

    #[test]
    fn test_cost_calculator_rejects_non_positive_budget() {
        let err = cost_calculator(Decimal::ZERO, &[]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
