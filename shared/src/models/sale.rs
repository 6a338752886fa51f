//! Sale audit models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActorRef, FinishedProductRef};

/// An immutable sale record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    pub invoice_number: String,
    pub items: Vec<SaleItem>,
    pub taxes: Decimal,
    pub total_amount: Decimal,
    pub user: ActorRef,
    pub created_at: DateTime<Utc>,
}

/// One sold line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub finished_product: FinishedProductRef,
    pub quantity: Decimal,
    pub price: Decimal,
}

/// Per-customer sales aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAnalytics {
    pub customer_name: String,
    pub store_name: Option<String>,
    pub contact_number: Option<String>,
    pub total_sales: i64,
    pub total_amount: Decimal,
    pub last_sale_date: DateTime<Utc>,
}
