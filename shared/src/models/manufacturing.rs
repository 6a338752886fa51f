//! Manufacturing audit models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActorRef, FinishedProductRef};

/// An immutable record of one manufacturing run: the recipe consumption
/// and the finished-product increase were applied in the same transaction
/// that wrote this log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturingLog {
    pub id: Uuid,
    pub finished_product: FinishedProductRef,
    pub quantity: Decimal,
    pub user: ActorRef,
    pub created_at: DateTime<Utc>,
}
