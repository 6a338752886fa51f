//! Purchase audit models
//!
//! Purchases are append-only: once written they are never updated or
//! deleted, and each one corresponds to raw-material stock increases
//! applied in the same transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActorRef, RawMaterialRef};

/// An immutable purchase record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    pub supplier: String,
    pub invoice_number: String,
    pub items: Vec<PurchaseItem>,
    pub total_amount: Decimal,
    pub user: ActorRef,
    pub created_at: DateTime<Utc>,
}

/// One purchased line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub raw_material: RawMaterialRef,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}
