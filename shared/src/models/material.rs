//! Raw material models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A purchasable input, stocked by quantity and unit of measure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterial {
    pub id: Uuid,
    pub name: String,
    pub stock: Decimal,
    /// Unit of measure, e.g. kg, liters, pieces
    pub unit: String,
    pub price_per_unit: Decimal,
    pub supplier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Resolved reference to a raw material inside another record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMaterialRef {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}
