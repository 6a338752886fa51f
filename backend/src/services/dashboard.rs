//! Dashboard service
//!
//! One snapshot query set: ledger totals, low-stock watchlists, and
//! today's trading figures (local midnight to now).

use chrono::{DateTime, Local, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{RawMaterial, Sale};
use crate::services::{PurchaseService, SalesService};

/// Raw materials below this stock level are flagged on the dashboard
const RAW_MATERIAL_LOW_STOCK: i64 = 10;

/// Finished products below this stock level are flagged on the dashboard
const FINISHED_PRODUCT_LOW_STOCK: i64 = 5;

/// Dashboard service
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

/// Dashboard snapshot
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub total_raw_material_stock: Decimal,
    pub total_finished_product_stock: Decimal,
    /// Today's purchase spend
    pub total_purchase_amount: Decimal,
    /// Today's sales revenue
    pub total_sales_amount: Decimal,
    pub low_stock_raw_materials: Vec<RawMaterial>,
    pub low_stock_finished_products: Vec<LowStockProduct>,
    pub todays_sales: Vec<Sale>,
}

/// Finished product flagged as low stock
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LowStockProduct {
    pub id: Uuid,
    pub name: String,
    pub stock: Decimal,
    pub price: Decimal,
}

#[derive(Debug, FromRow)]
struct RawMaterialRow {
    id: Uuid,
    name: String,
    stock: Decimal,
    unit: String,
    price_per_unit: Decimal,
    supplier: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DashboardService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Build the dashboard snapshot
    pub async fn snapshot(&self) -> AppResult<DashboardSnapshot> {
        let today_start = local_midnight();

        let total_raw_material_stock = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT SUM(stock) FROM raw_materials",
        )
        .fetch_one(&self.db)
        .await?
        .unwrap_or(Decimal::ZERO);

        let total_finished_product_stock = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT SUM(stock) FROM finished_products",
        )
        .fetch_one(&self.db)
        .await?
        .unwrap_or(Decimal::ZERO);

        let low_stock_raw_materials = sqlx::query_as::<_, RawMaterialRow>(
            r#"
            SELECT id, name, stock, unit, price_per_unit, supplier, created_at, updated_at
            FROM raw_materials
            WHERE stock < $1
            ORDER BY stock ASC
            "#,
        )
        .bind(Decimal::from(RAW_MATERIAL_LOW_STOCK))
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| RawMaterial {
            id: row.id,
            name: row.name,
            stock: row.stock,
            unit: row.unit,
            price_per_unit: row.price_per_unit,
            supplier: row.supplier,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
        .collect();

        let low_stock_finished_products = sqlx::query_as::<_, LowStockProduct>(
            r#"
            SELECT id, name, stock, price
            FROM finished_products
            WHERE stock < $1
            ORDER BY stock ASC
            "#,
        )
        .bind(Decimal::from(FINISHED_PRODUCT_LOW_STOCK))
        .fetch_all(&self.db)
        .await?;

        let purchases = PurchaseService::new(self.db.clone());
        let sales = SalesService::new(self.db.clone());

        let total_purchase_amount = purchases.total_amount_since(today_start).await?;
        let todays_sales = sales.sales_since(today_start).await?;
        let total_sales_amount = todays_sales
            .iter()
            .fold(Decimal::ZERO, |acc, sale| acc + sale.total_amount);

        Ok(DashboardSnapshot {
            total_raw_material_stock,
            total_finished_product_stock,
            total_purchase_amount,
            total_sales_amount,
            low_stock_raw_materials,
            low_stock_finished_products,
            todays_sales,
        })
    }
}

/// Start of today in the server's local timezone, as a UTC instant
fn local_midnight() -> DateTime<Utc> {
    let now = Local::now();
    match now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| Local.from_local_datetime(&midnight).earliest())
    {
        Some(start) => start.with_timezone(&Utc),
        None => now.with_timezone(&Utc),
    }
}
