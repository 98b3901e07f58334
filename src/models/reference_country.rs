use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Origin country a traveller compares destinations against
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceCountry {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub currency: String,
    pub flag: String,
    pub avg_monthly_cost: Decimal,
}
