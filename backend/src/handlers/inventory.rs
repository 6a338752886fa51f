//! HTTP handlers for inventory administration endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::{FinishedProduct, RawMaterial};
use crate::services::inventory::{FinishedProductInput, InventoryService, RawMaterialInput};
use crate::AppState;
use shared::{PageQuery, Paginated};

/// List raw materials
pub async fn list_raw_materials(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<RawMaterial>>> {
    let service = InventoryService::new(state.db);
    let materials = service.list_raw_materials(&query).await?;
    Ok(Json(materials))
}

/// Create a raw material
pub async fn create_raw_material(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<RawMaterialInput>,
) -> AppResult<(StatusCode, Json<RawMaterial>)> {
    let service = InventoryService::new(state.db);
    let material = service.create_raw_material(input).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

/// Replace a raw material's fields
pub async fn update_raw_material(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(material_id): Path<Uuid>,
    Json(input): Json<RawMaterialInput>,
) -> AppResult<Json<RawMaterial>> {
    let service = InventoryService::new(state.db);
    let material = service.update_raw_material(material_id, input).await?;
    Ok(Json(material))
}

/// List finished products with their recipes
pub async fn list_finished_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<FinishedProduct>>> {
    let service = InventoryService::new(state.db);
    let products = service.list_finished_products(&query).await?;
    Ok(Json(products))
}

/// Create a finished product with its recipe
pub async fn create_finished_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<FinishedProductInput>,
) -> AppResult<(StatusCode, Json<FinishedProduct>)> {
    let service = InventoryService::new(state.db);
    let product = service.create_finished_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a finished product's fields and recipe
pub async fn update_finished_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<FinishedProductInput>,
) -> AppResult<Json<FinishedProduct>> {
    let service = InventoryService::new(state.db);
    let product = service.update_finished_product(product_id, input).await?;
    Ok(Json(product))
}
