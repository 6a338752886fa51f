//! Purchase intake service
//!
//! Creates immutable purchase records and applies the matching raw-material
//! stock increases in a single database transaction, so the audit trail and
//! the ledger can never drift apart.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ActorRef, Purchase, PurchaseItem, RawMaterialRef};
use shared::{PageQuery, Paginated};

/// Purchase intake service
#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
}

/// Input for creating a purchase
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseInput {
    pub supplier: String,
    pub invoice_number: String,
    pub items: Vec<PurchaseItemInput>,
    pub total_amount: Decimal,
}

/// One line of a purchase order
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItemInput {
    /// Raw material id
    pub raw_material: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// Row for the paginated purchase listing
#[derive(Debug, FromRow)]
struct PurchaseRow {
    id: Uuid,
    supplier: String,
    invoice_number: String,
    total_amount: Decimal,
    created_by: Uuid,
    user_name: Option<String>,
    created_at: DateTime<Utc>,
}

/// Row for purchase line items with resolved material names
#[derive(Debug, FromRow)]
struct PurchaseItemRow {
    purchase_id: Uuid,
    raw_material_id: Uuid,
    raw_material_name: String,
    quantity: Decimal,
    unit_price: Decimal,
}

impl PurchaseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a purchase and increase the referenced raw-material stocks.
    ///
    /// The whole sequence runs in one transaction: if any referenced raw
    /// material does not exist the request fails with 404 and nothing is
    /// written.
    pub async fn create_purchase(
        &self,
        user_id: Uuid,
        input: CreatePurchaseInput,
    ) -> AppResult<Purchase> {
        if input.items.is_empty() {
            return Err(AppError::EmptyOrder);
        }

        for item in &input.items {
            shared::validate_quantity(item.quantity).map_err(|msg| AppError::Validation {
                field: "items.quantity".to_string(),
                message: msg.to_string(),
            })?;
            shared::validate_unit_price(item.unit_price).map_err(|msg| AppError::Validation {
                field: "items.unitPrice".to_string(),
                message: msg.to_string(),
            })?;
        }

        let mut tx = self.db.begin().await?;

        // Resolve every referenced raw material up front; an unknown
        // reference rejects the whole purchase before any write.
        let mut material_names: HashMap<Uuid, String> = HashMap::new();
        for item in &input.items {
            let name = sqlx::query_scalar::<_, String>(
                "SELECT name FROM raw_materials WHERE id = $1",
            )
            .bind(item.raw_material)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Raw material".to_string()))?;
            material_names.insert(item.raw_material, name);
        }

        let (purchase_id, created_at) = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            r#"
            INSERT INTO purchases (supplier, invoice_number, total_amount, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at
            "#,
        )
        .bind(&input.supplier)
        .bind(&input.invoice_number)
        .bind(input.total_amount)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        for (position, item) in input.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO purchase_items (purchase_id, raw_material_id, quantity, unit_price, position)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(purchase_id)
            .bind(item.raw_material)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "UPDATE raw_materials SET stock = stock + $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(item.quantity)
            .bind(item.raw_material)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let items = input
            .items
            .iter()
            .map(|item| PurchaseItem {
                raw_material: RawMaterialRef {
                    id: item.raw_material,
                    name: material_names
                        .get(&item.raw_material)
                        .cloned()
                        .unwrap_or_default(),
                    unit: None,
                },
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();

        Ok(Purchase {
            id: purchase_id,
            supplier: input.supplier,
            invoice_number: input.invoice_number,
            items,
            total_amount: input.total_amount,
            user: ActorRef {
                id: user_id,
                name: None,
            },
            created_at,
        })
    }

    /// List purchases, newest first, with resolved material and actor names
    pub async fn list_purchases(&self, query: &PageQuery) -> AppResult<Paginated<Purchase>> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM purchases")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, PurchaseRow>(
            r#"
            SELECT p.id, p.supplier, p.invoice_number, p.total_amount, p.created_by,
                   u.name AS user_name, p.created_at
            FROM purchases p
            LEFT JOIN users u ON u.id = p.created_by
            ORDER BY p.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(query.limit()))
        .bind(query.offset())
        .fetch_all(&self.db)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut items_by_purchase = self.fetch_items(&ids).await?;

        let purchases = rows
            .into_iter()
            .map(|row| Purchase {
                id: row.id,
                supplier: row.supplier,
                invoice_number: row.invoice_number,
                items: items_by_purchase.remove(&row.id).unwrap_or_default(),
                total_amount: row.total_amount,
                user: ActorRef {
                    id: row.created_by,
                    name: row.user_name,
                },
                created_at: row.created_at,
            })
            .collect();

        Ok(Paginated::new(purchases, total, query))
    }

    /// Sum of purchase totals recorded since the given cutoff
    pub async fn total_amount_since(&self, cutoff: DateTime<Utc>) -> AppResult<Decimal> {
        let total = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT SUM(total_amount) FROM purchases WHERE created_at >= $1",
        )
        .bind(cutoff)
        .fetch_one(&self.db)
        .await?;

        Ok(total.unwrap_or(Decimal::ZERO))
    }

    /// Fetch line items for a set of purchases, grouped by purchase id
    async fn fetch_items(
        &self,
        purchase_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<PurchaseItem>>> {
        if purchase_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, PurchaseItemRow>(
            r#"
            SELECT pi.purchase_id, pi.raw_material_id, rm.name AS raw_material_name,
                   pi.quantity, pi.unit_price
            FROM purchase_items pi
            JOIN raw_materials rm ON rm.id = pi.raw_material_id
            WHERE pi.purchase_id = ANY($1)
            ORDER BY pi.position
            "#,
        )
        .bind(purchase_ids)
        .fetch_all(&self.db)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<PurchaseItem>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.purchase_id)
                .or_default()
                .push(PurchaseItem {
                    raw_material: RawMaterialRef {
                        id: row.raw_material_id,
                        name: row.raw_material_name,
                        unit: None,
                    },
                    quantity: row.quantity,
                    unit_price: row.unit_price,
                });
        }

        Ok(grouped)
    }
}
