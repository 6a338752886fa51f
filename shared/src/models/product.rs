//! Finished product and recipe models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RawMaterialRef;

/// A sellable output, produced by manufacturing according to its recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedProduct {
    pub id: Uuid,
    pub name: String,
    pub stock: Decimal,
    pub price: Decimal,
    /// Bill of materials: raw-material quantities per unit produced
    pub recipe: Vec<RecipeLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of a recipe: raw material required per single finished unit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLine {
    pub raw_material: RawMaterialRef,
    pub quantity: Decimal,
}

/// Resolved reference to a finished product inside another record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinishedProductRef {
    pub id: Uuid,
    pub name: String,
}
