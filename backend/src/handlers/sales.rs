//! HTTP handlers for sales fulfillment endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::{CustomerAnalytics, Sale};
use crate::services::sales::{CreateSaleInput, SalesService};
use crate::AppState;
use shared::{PageQuery, Paginated};

/// Create a sale and apply the stock decrements
pub async fn create_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateSaleInput>,
) -> AppResult<(StatusCode, Json<Sale>)> {
    let service = SalesService::new(state.db);
    let sale = service.create_sale(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// List sales (paginated, newest first)
pub async fn list_sales(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<Sale>>> {
    let service = SalesService::new(state.db);
    let sales = service.list_sales(&query).await?;
    Ok(Json(sales))
}

/// Response envelope for customer analytics
#[derive(Serialize)]
pub struct CustomerAnalyticsResponse {
    pub data: Vec<CustomerAnalytics>,
}

/// Per-customer sales aggregation, highest total first
pub async fn get_customer_analytics(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<CustomerAnalyticsResponse>> {
    let service = SalesService::new(state.db);
    let data = service.customer_analytics().await?;
    Ok(Json(CustomerAnalyticsResponse { data }))
}
