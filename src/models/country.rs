use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Economic risk classification of a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            _ => Err(format!("Invalid risk level: {}", s)),
        }
    }
}

/// Direction the currency is moving in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Trend::Up),
            "down" => Ok(Trend::Down),
            "stable" => Ok(Trend::Stable),
            _ => Err(format!("Invalid trend: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Continent {
    America,
    Europe,
    Asia,
    Africa,
    Oceania,
}

impl Continent {
    pub const ALL: [Continent; 5] = [
        Continent::America,
        Continent::Europe,
        Continent::Asia,
        Continent::Africa,
        Continent::Oceania,
    ];

    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "america" => Ok(Continent::America),
            "europe" => Ok(Continent::Europe),
            "asia" => Ok(Continent::Asia),
            "africa" => Ok(Continent::Africa),
            "oceania" => Ok(Continent::Oceania),
            _ => Err(format!("Invalid continent: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            Continent::America => "america",
            Continent::Europe => "europe",
            Continent::Asia => "asia",
            Continent::Africa => "africa",
            Continent::Oceania => "oceania",
        }
    }
}

/// Destination country with its economic profile
///
/// The four cost components are expected to add up to roughly
/// `monthly_living_cost`; nothing enforces it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Country {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub currency: String,
    pub flag: String,
    pub continent: String, // Stored as TEXT, use Continent enum for type safety
    pub devaluation_vs_usd: Decimal,
    pub big_mac_index: Decimal,
    pub monthly_living_cost: Decimal,
    pub rent_cost: Decimal,
    pub food_cost: Decimal,
    pub transport_cost: Decimal,
    pub entertainment_cost: Decimal,
    pub risk_level: String, // Stored as TEXT, use RiskLevel enum for type safety
    pub trend: String,      // Stored as TEXT, use Trend enum for type safety
    pub highlights: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Country {
    /// Get continent as an enum
    pub fn continent_enum(&self) -> Option<Continent> {
        Continent::from_str(&self.continent).ok()
    }

    /// Get risk level as an enum
    pub fn risk_level_enum(&self) -> RiskLevel {
        RiskLevel::from_str(&self.risk_level).unwrap_or(RiskLevel::Medium)
    }

    /// Get trend as an enum
    pub fn trend_enum(&self) -> Trend {
        Trend::from_str(&self.trend).unwrap_or(Trend::Stable)
    }

    /// Sum of rent, food, transport and entertainment
    pub fn component_total(&self) -> Decimal {
        self.rent_cost + self.food_cost + self.transport_cost + self.entertainment_cost
    }
}

/// The slice of a country row the rate ingestion job reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TrackedCountry {
    pub id: Uuid,
    pub code: String,
    pub currency: String,
    pub devaluation_vs_usd: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_conversion() {
        assert_eq!(RiskLevel::from_str("HIGH").unwrap(), RiskLevel::High);
        assert!(RiskLevel::from_str("extreme").is_err());
    }

    #[test]
    fn test_continent_conversion() {
        for continent in Continent::ALL {
            assert_eq!(Continent::from_str(continent.as_str()).unwrap(), continent);
        }
        assert!(Continent::from_str("antarctica").is_err());
    }

    #[test]
    fn test_unknown_trend_defaults_to_stable() {
        let now = Utc::now();
        let country = Country {
            id: Uuid::new_v4(),
            code: "AR".into(),
            name: "Argentina".into(),
            currency: "ARS".into(),
            flag: "🇦🇷".into(),
            continent: "america".into(),
            devaluation_vs_usd: Decimal::new(1890, 1),
            big_mac_index: Decimal::new(550, 2),
            monthly_living_cost: Decimal::new(800, 0),
            rent_cost: Decimal::new(400, 0),
            food_cost: Decimal::new(250, 0),
            transport_cost: Decimal::new(50, 0),
            entertainment_cost: Decimal::new(100, 0),
            risk_level: "high".into(),
            trend: "sideways".into(),
            highlights: vec![],
            created_at: now,
            updated_at: now,
        };

        assert_eq!(country.trend_enum(), Trend::Stable);
        assert_eq!(country.risk_level_enum(), RiskLevel::High);
        assert_eq!(country.continent_enum(), Some(Continent::America));
        assert_eq!(country.component_total(), country.monthly_living_cost);
    }
}
