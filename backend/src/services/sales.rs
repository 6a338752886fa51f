//! Sales fulfillment service
//!
//! Validates every line of a sale against current finished-product stock
//! before anything is written (all-or-nothing pre-pass), then records the
//! sale and decrements stock inside the same transaction. The affected
//! product rows are locked for the duration, so two concurrent sales of the
//! same product serialize instead of both passing a stale check.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ActorRef, CustomerAnalytics, FinishedProductRef, Sale, SaleItem};
use shared::{has_sufficient_stock, PageQuery, Paginated};

/// Sales fulfillment service
#[derive(Clone)]
pub struct SalesService {
    db: PgPool,
}

/// Input for creating a sale
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleInput {
    pub customer_name: String,
    pub store_name: Option<String>,
    pub contact_number: Option<String>,
    pub invoice_number: String,
    pub items: Vec<SaleItemInput>,
    #[serde(default)]
    pub taxes: Decimal,
    pub total_amount: Decimal,
}

/// One line of a sale
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemInput {
    /// Finished product id
    pub finished_product: Uuid,
    pub quantity: Decimal,
    pub price: Decimal,
}

/// Row for the paginated sale listing
#[derive(Debug, FromRow)]
struct SaleRow {
    id: Uuid,
    customer_name: String,
    store_name: Option<String>,
    contact_number: Option<String>,
    invoice_number: String,
    taxes: Decimal,
    total_amount: Decimal,
    created_by: Uuid,
    user_name: Option<String>,
    created_at: DateTime<Utc>,
}

/// Row for sale line items with resolved product names
#[derive(Debug, FromRow)]
struct SaleItemRow {
    sale_id: Uuid,
    finished_product_id: Uuid,
    finished_product_name: String,
    quantity: Decimal,
    price: Decimal,
}

/// Product row locked during the pre-pass
#[derive(Debug, FromRow)]
struct LockedProduct {
    id: Uuid,
    name: String,
    stock: Decimal,
}

impl SalesService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a sale and decrement the referenced finished-product stocks.
    ///
    /// The pre-pass locks each referenced product row and rejects the whole
    /// request if any product is missing or short; only then are the sale
    /// record and the decrements committed together.
    pub async fn create_sale(&self, user_id: Uuid, input: CreateSaleInput) -> AppResult<Sale> {
        if input.items.is_empty() {
            return Err(AppError::EmptyOrder);
        }

        for item in &input.items {
            shared::validate_quantity(item.quantity).map_err(|msg| AppError::Validation {
                field: "items.quantity".to_string(),
                message: msg.to_string(),
            })?;
            shared::validate_unit_price(item.price).map_err(|msg| AppError::Validation {
                field: "items.price".to_string(),
                message: msg.to_string(),
            })?;
        }

        let mut tx = self.db.begin().await?;

        // Pre-pass: lock and validate every line before any mutation
        let mut product_names: HashMap<Uuid, String> = HashMap::new();
        for item in &input.items {
            let product = sqlx::query_as::<_, LockedProduct>(
                "SELECT id, name, stock FROM finished_products WHERE id = $1 FOR UPDATE",
            )
            .bind(item.finished_product)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Finished product".to_string()))?;

            if !has_sufficient_stock(product.stock, item.quantity) {
                return Err(AppError::InsufficientStock {
                    name: product.name,
                    required: item.quantity,
                    available: product.stock,
                });
            }
            product_names.insert(product.id, product.name);
        }

        let (sale_id, created_at) = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            r#"
            INSERT INTO sales (customer_name, store_name, contact_number, invoice_number,
                               taxes, total_amount, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, created_at
            "#,
        )
        .bind(&input.customer_name)
        .bind(&input.store_name)
        .bind(&input.contact_number)
        .bind(&input.invoice_number)
        .bind(input.taxes)
        .bind(input.total_amount)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        for (position, item) in input.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, finished_product_id, quantity, price, position)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(sale_id)
            .bind(item.finished_product)
            .bind(item.quantity)
            .bind(item.price)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "UPDATE finished_products SET stock = stock - $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(item.quantity)
            .bind(item.finished_product)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let items = input
            .items
            .iter()
            .map(|item| SaleItem {
                finished_product: FinishedProductRef {
                    id: item.finished_product,
                    name: product_names
                        .get(&item.finished_product)
                        .cloned()
                        .unwrap_or_default(),
                },
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        Ok(Sale {
            id: sale_id,
            customer_name: input.customer_name,
            store_name: input.store_name,
            contact_number: input.contact_number,
            invoice_number: input.invoice_number,
            items,
            taxes: input.taxes,
            total_amount: input.total_amount,
            user: ActorRef {
                id: user_id,
                name: None,
            },
            created_at,
        })
    }

    /// List sales, newest first, with resolved product and actor names
    pub async fn list_sales(&self, query: &PageQuery) -> AppResult<Paginated<Sale>> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT s.id, s.customer_name, s.store_name, s.contact_number, s.invoice_number,
                   s.taxes, s.total_amount, s.created_by, u.name AS user_name, s.created_at
            FROM sales s
            LEFT JOIN users u ON u.id = s.created_by
            ORDER BY s.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(query.limit()))
        .bind(query.offset())
        .fetch_all(&self.db)
        .await?;

        let sales = self.assemble(rows).await?;
        Ok(Paginated::new(sales, total, query))
    }

    /// Sales recorded since the given cutoff, newest first
    pub async fn sales_since(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT s.id, s.customer_name, s.store_name, s.contact_number, s.invoice_number,
                   s.taxes, s.total_amount, s.created_by, u.name AS user_name, s.created_at
            FROM sales s
            LEFT JOIN users u ON u.id = s.created_by
            WHERE s.created_at >= $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;

        self.assemble(rows).await
    }

    /// Per-customer sales aggregation, highest total first
    pub async fn customer_analytics(&self) -> AppResult<Vec<CustomerAnalytics>> {
        let rows = sqlx::query_as::<_, CustomerAnalyticsRow>(
            r#"
            SELECT customer_name, store_name, contact_number,
                   COUNT(*) AS total_sales,
                   SUM(total_amount) AS total_amount,
                   MAX(created_at) AS last_sale_date
            FROM sales
            GROUP BY customer_name, store_name, contact_number
            ORDER BY SUM(total_amount) DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CustomerAnalytics {
                customer_name: row.customer_name,
                store_name: row.store_name,
                contact_number: row.contact_number,
                total_sales: row.total_sales,
                total_amount: row.total_amount,
                last_sale_date: row.last_sale_date,
            })
            .collect())
    }

    /// Resolve line items and build full sale models for a page of rows
    async fn assemble(&self, rows: Vec<SaleRow>) -> AppResult<Vec<Sale>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut items_by_sale = self.fetch_items(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| Sale {
                id: row.id,
                customer_name: row.customer_name,
                store_name: row.store_name,
                contact_number: row.contact_number,
                invoice_number: row.invoice_number,
                items: items_by_sale.remove(&row.id).unwrap_or_default(),
                taxes: row.taxes,
                total_amount: row.total_amount,
                user: ActorRef {
                    id: row.created_by,
                    name: row.user_name,
                },
                created_at: row.created_at,
            })
            .collect())
    }

    /// Fetch line items for a set of sales, grouped by sale id
    async fn fetch_items(&self, sale_ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<SaleItem>>> {
        if sale_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT si.sale_id, si.finished_product_id, fp.name AS finished_product_name,
                   si.quantity, si.price
            FROM sale_items si
            JOIN finished_products fp ON fp.id = si.finished_product_id
            WHERE si.sale_id = ANY($1)
            ORDER BY si.position
            "#,
        )
        .bind(sale_ids)
        .fetch_all(&self.db)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<SaleItem>> = HashMap::new();
        for row in rows {
            grouped.entry(row.sale_id).or_default().push(SaleItem {
                finished_product: FinishedProductRef {
                    id: row.finished_product_id,
                    name: row.finished_product_name,
                },
                quantity: row.quantity,
                price: row.price,
            });
        }

        Ok(grouped)
    }
}

/// Row for the customer analytics aggregation
#[derive(Debug, FromRow)]
struct CustomerAnalyticsRow {
    customer_name: String,
    store_name: Option<String>,
    contact_number: Option<String>,
    total_sales: i64,
    total_amount: Decimal,
    last_sale_date: DateTime<Utc>,
}
