//! Manufacturing run service
//!
//! Consumes raw materials according to the finished product's current
//! recipe and increases the product's stock, writing the manufacturing log
//! in the same transaction. The recipe is read at manufacture time, never
//! cached.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ActorRef, FinishedProductRef, ManufacturingLog};
use shared::{has_sufficient_stock, required_material_quantity, PageQuery, Paginated};

/// Manufacturing run service
#[derive(Clone)]
pub struct ManufacturingService {
    db: PgPool,
}

/// Input for a manufacturing run
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufactureInput {
    pub finished_product_id: Uuid,
    pub quantity: Decimal,
}

/// Row for the paginated log listing
#[derive(Debug, FromRow)]
struct LogRow {
    id: Uuid,
    finished_product_id: Uuid,
    finished_product_name: String,
    quantity: Decimal,
    created_by: Uuid,
    user_name: Option<String>,
    created_at: DateTime<Utc>,
}

/// Product row locked for the run
#[derive(Debug, FromRow)]
struct LockedProduct {
    id: Uuid,
    name: String,
}

/// Recipe line joined with the locked raw-material row
#[derive(Debug, FromRow)]
struct RecipeLineRow {
    raw_material_id: Uuid,
    raw_material_name: String,
    per_unit: Decimal,
    stock: Decimal,
}

impl ManufacturingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Execute a manufacturing run.
    ///
    /// Pre-pass: lock the product and every recipe raw material, verify
    /// each material covers `recipeQty x quantity`. Only then: decrement
    /// the raw materials, increment the product, write the log. One
    /// transaction end to end.
    pub async fn manufacture(
        &self,
        user_id: Uuid,
        input: ManufactureInput,
    ) -> AppResult<ManufacturingLog> {
        shared::validate_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        let mut tx = self.db.begin().await?;

        let product = sqlx::query_as::<_, LockedProduct>(
            "SELECT id, name FROM finished_products WHERE id = $1 FOR UPDATE",
        )
        .bind(input.finished_product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Finished product".to_string()))?;

        // Current recipe, with each raw-material row locked
        let recipe = sqlx::query_as::<_, RecipeLineRow>(
            r#"
            SELECT ri.raw_material_id, rm.name AS raw_material_name,
                   ri.quantity AS per_unit, rm.stock
            FROM recipe_items ri
            JOIN raw_materials rm ON rm.id = ri.raw_material_id
            WHERE ri.finished_product_id = $1
            ORDER BY ri.position
            FOR UPDATE OF rm
            "#,
        )
        .bind(product.id)
        .fetch_all(&mut *tx)
        .await?;

        // Pre-pass over all recipe lines before any mutation
        for line in &recipe {
            let required = required_material_quantity(line.per_unit, input.quantity);
            if !has_sufficient_stock(line.stock, required) {
                return Err(AppError::InsufficientStock {
                    name: line.raw_material_name.clone(),
                    required,
                    available: line.stock,
                });
            }
        }

        // Deduct raw materials
        for line in &recipe {
            let required = required_material_quantity(line.per_unit, input.quantity);
            sqlx::query(
                "UPDATE raw_materials SET stock = stock - $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(required)
            .bind(line.raw_material_id)
            .execute(&mut *tx)
            .await?;
        }

        // Increase finished product stock
        sqlx::query(
            "UPDATE finished_products SET stock = stock + $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(input.quantity)
        .bind(product.id)
        .execute(&mut *tx)
        .await?;

        let (log_id, created_at) = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            r#"
            INSERT INTO manufacturing_logs (finished_product_id, quantity, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, created_at
            "#,
        )
        .bind(product.id)
        .bind(input.quantity)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ManufacturingLog {
            id: log_id,
            finished_product: FinishedProductRef {
                id: product.id,
                name: product.name,
            },
            quantity: input.quantity,
            user: ActorRef {
                id: user_id,
                name: None,
            },
            created_at,
        })
    }

    /// List manufacturing logs, newest first
    pub async fn list_logs(&self, query: &PageQuery) -> AppResult<Paginated<ManufacturingLog>> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM manufacturing_logs")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, LogRow>(
            r#"
            SELECT ml.id, ml.finished_product_id, fp.name AS finished_product_name,
                   ml.quantity, ml.created_by, u.name AS user_name, ml.created_at
            FROM manufacturing_logs ml
            JOIN finished_products fp ON fp.id = ml.finished_product_id
            LEFT JOIN users u ON u.id = ml.created_by
            ORDER BY ml.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(query.limit()))
        .bind(query.offset())
        .fetch_all(&self.db)
        .await?;

        let logs = rows
            .into_iter()
            .map(|row| ManufacturingLog {
                id: row.id,
                finished_product: FinishedProductRef {
                    id: row.finished_product_id,
                    name: row.finished_product_name,
                },
                quantity: row.quantity,
                user: ActorRef {
                    id: row.created_by,
                    name: row.user_name,
                },
                created_at: row.created_at,
            })
            .collect();

        Ok(Paginated::new(logs, total, query))
    }
}
