//! Inventory administration service
//!
//! Direct create/read/update of raw materials and finished products.
//! Recipes are stored as ordered lines against the finished product and
//! replaced wholesale on update; the transaction processors always read
//! the current definition.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{FinishedProduct, RawMaterial, RawMaterialRef, RecipeLine};
use shared::{PageQuery, Paginated};

/// Inventory administration service
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Input for creating or replacing a raw material
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialInput {
    pub name: String,
    #[serde(default)]
    pub stock: Decimal,
    pub unit: String,
    pub price_per_unit: Decimal,
    pub supplier: Option<String>,
}

/// Input for creating or replacing a finished product
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedProductInput {
    pub name: String,
    #[serde(default)]
    pub stock: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub recipe: Vec<RecipeLineInput>,
}

/// One recipe line: raw material required per finished unit
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLineInput {
    pub raw_material: Uuid,
    pub quantity: Decimal,
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

impl From<RawMaterialRow> for RawMaterial {
    fn from(row: RawMaterialRow) -> Self {
        RawMaterial {
            id: row.id,
            name: row.name,
            stock: row.stock,
            unit: row.unit,
            price_per_unit: row.price_per_unit,
            supplier: row.supplier,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    stock: Decimal,
    price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct RecipeItemRow {
    finished_product_id: Uuid,
    raw_material_id: Uuid,
    raw_material_name: String,
    raw_material_unit: String,
    quantity: Decimal,
}

const RAW_MATERIAL_COLUMNS: &str =
    "id, name, stock, unit, price_per_unit, supplier, created_at, updated_at";

impl InventoryService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Raw Materials
    // ========================================================================

    /// List raw materials (paginated)
    pub async fn list_raw_materials(&self, query: &PageQuery) -> AppResult<Paginated<RawMaterial>> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM raw_materials")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, RawMaterialRow>(&format!(
            "SELECT {RAW_MATERIAL_COLUMNS} FROM raw_materials ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        ))
        .bind(i64::from(query.limit()))
        .bind(query.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(Paginated::new(
            rows.into_iter().map(RawMaterial::from).collect(),
            total,
            query,
        ))
    }

    /// Create a raw material
    pub async fn create_raw_material(&self, input: RawMaterialInput) -> AppResult<RawMaterial> {
        self.validate_material_input(&input)?;

        let row = sqlx::query_as::<_, RawMaterialRow>(&format!(
            r#"
            INSERT INTO raw_materials (name, stock, unit, price_per_unit, supplier)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {RAW_MATERIAL_COLUMNS}
            "#,
        ))
        .bind(&input.name)
        .bind(input.stock)
        .bind(&input.unit)
        .bind(input.price_per_unit)
        .bind(&input.supplier)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Replace a raw material's fields
    pub async fn update_raw_material(
        &self,
        material_id: Uuid,
        input: RawMaterialInput,
    ) -> AppResult<RawMaterial> {
        self.validate_material_input(&input)?;

        let row = sqlx::query_as::<_, RawMaterialRow>(&format!(
            r#"
            UPDATE raw_materials
            SET name = $1, stock = $2, unit = $3, price_per_unit = $4, supplier = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING {RAW_MATERIAL_COLUMNS}
            "#,
        ))
        .bind(&input.name)
        .bind(input.stock)
        .bind(&input.unit)
        .bind(input.price_per_unit)
        .bind(&input.supplier)
        .bind(material_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Raw material".to_string()))?;

        Ok(row.into())
    }

    // ========================================================================
    // Finished Products
    // ========================================================================

    /// List finished products with resolved recipes (paginated)
    pub async fn list_finished_products(
        &self,
        query: &PageQuery,
    ) -> AppResult<Paginated<FinishedProduct>> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM finished_products")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, stock, price, created_at, updated_at
            FROM finished_products
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(query.limit()))
        .bind(query.offset())
        .fetch_all(&self.db)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut recipes = self.fetch_recipes(&ids).await?;

        let products = rows
            .into_iter()
            .map(|row| FinishedProduct {
                id: row.id,
                name: row.name,
                stock: row.stock,
                price: row.price,
                recipe: recipes.remove(&row.id).unwrap_or_default(),
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect();

        Ok(Paginated::new(products, total, query))
    }

    /// Create a finished product with its recipe
    pub async fn create_finished_product(
        &self,
        input: FinishedProductInput,
    ) -> AppResult<FinishedProduct> {
        self.validate_product_input(&input)?;

        let mut tx = self.db.begin().await?;

        for line in &input.recipe {
            self.ensure_material_exists(&mut tx, line.raw_material)
                .await?;
        }

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO finished_products (name, stock, price)
            VALUES ($1, $2, $3)
            RETURNING id, name, stock, price, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.stock)
        .bind(input.price)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_recipe(&mut tx, row.id, &input.recipe).await?;

        tx.commit().await?;

        self.load_product(row).await
    }

    /// Replace a finished product's fields and recipe
    pub async fn update_finished_product(
        &self,
        product_id: Uuid,
        input: FinishedProductInput,
    ) -> AppResult<FinishedProduct> {
        self.validate_product_input(&input)?;

        let mut tx = self.db.begin().await?;

        for line in &input.recipe {
            self.ensure_material_exists(&mut tx, line.raw_material)
                .await?;
        }

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE finished_products
            SET name = $1, stock = $2, price = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, name, stock, price, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.stock)
        .bind(input.price)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Finished product".to_string()))?;

        sqlx::query("DELETE FROM recipe_items WHERE finished_product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        Self::insert_recipe(&mut tx, product_id, &input.recipe).await?;

        tx.commit().await?;

        self.load_product(row).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn validate_material_input(&self, input: &RawMaterialInput) -> AppResult<()> {
        shared::validate_stock_level(input.stock).map_err(|msg| AppError::Validation {
            field: "stock".to_string(),
            message: msg.to_string(),
        })?;
        shared::validate_unit_price(input.price_per_unit).map_err(|msg| AppError::Validation {
            field: "pricePerUnit".to_string(),
            message: msg.to_string(),
        })?;
        Ok(())
    }

    fn validate_product_input(&self, input: &FinishedProductInput) -> AppResult<()> {
        shared::validate_stock_level(input.stock).map_err(|msg| AppError::Validation {
            field: "stock".to_string(),
            message: msg.to_string(),
        })?;
        shared::validate_unit_price(input.price).map_err(|msg| AppError::Validation {
            field: "price".to_string(),
            message: msg.to_string(),
        })?;
        for line in &input.recipe {
            shared::validate_recipe_quantity(line.quantity).map_err(|msg| {
                AppError::Validation {
                    field: "recipe.quantity".to_string(),
                    message: msg.to_string(),
                }
            })?;
        }
        Ok(())
    }

    async fn ensure_material_exists(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        material_id: Uuid,
    ) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM raw_materials WHERE id = $1)",
        )
        .bind(material_id)
        .fetch_one(&mut **tx)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Raw material".to_string()));
        }
        Ok(())
    }

    async fn insert_recipe(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        product_id: Uuid,
        recipe: &[RecipeLineInput],
    ) -> AppResult<()> {
        for (position, line) in recipe.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO recipe_items (finished_product_id, raw_material_id, quantity, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(product_id)
            .bind(line.raw_material)
            .bind(line.quantity)
            .bind(position as i32)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn load_product(&self, row: ProductRow) -> AppResult<FinishedProduct> {
        let mut recipes = self.fetch_recipes(&[row.id]).await?;
        Ok(FinishedProduct {
            id: row.id,
            name: row.name,
            stock: row.stock,
            price: row.price,
            recipe: recipes.remove(&row.id).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Fetch recipes for a set of products, grouped by product id
    async fn fetch_recipes(
        &self,
        product_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<RecipeLine>>> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, RecipeItemRow>(
            r#"
            SELECT ri.finished_product_id, ri.raw_material_id,
                   rm.name AS raw_material_name, rm.unit AS raw_material_unit,
                   ri.quantity
            FROM recipe_items ri
            JOIN raw_materials rm ON rm.id = ri.raw_material_id
            WHERE ri.finished_product_id = ANY($1)
            ORDER BY ri.position
            "#,
        )
        .bind(product_ids)
        .fetch_all(&self.db)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<RecipeLine>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.finished_product_id)
                .or_default()
                .push(RecipeLine {
                    raw_material: RawMaterialRef {
                        id: row.raw_material_id,
                        name: row.raw_material_name,
                        unit: Some(row.raw_material_unit),
                    },
                    quantity: row.quantity,
                });
        }

        Ok(grouped)
    }
}
