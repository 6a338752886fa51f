//! HTTP handlers for purchase intake endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::Purchase;
use crate::services::purchase::{CreatePurchaseInput, PurchaseService};
use crate::AppState;
use shared::{PageQuery, Paginated};

/// Create a purchase and apply the stock increases
pub async fn create_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePurchaseInput>,
) -> AppResult<(StatusCode, Json<Purchase>)> {
    let service = PurchaseService::new(state.db);
    let purchase = service
        .create_purchase(current_user.0.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

/// List purchases (paginated, newest first)
pub async fn list_purchases(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<Purchase>>> {
    let service = PurchaseService::new(state.db);
    let purchases = service.list_purchases(&query).await?;
    Ok(Json(purchases))
}
