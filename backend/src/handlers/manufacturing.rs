//! HTTP handlers for manufacturing endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::ManufacturingLog;
use crate::services::manufacturing::{ManufactureInput, ManufacturingService};
use crate::AppState;
use shared::{PageQuery, Paginated};

/// Run a manufacturing job: consume the recipe, produce the product
pub async fn manufacture_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ManufactureInput>,
) -> AppResult<(StatusCode, Json<ManufacturingLog>)> {
    let service = ManufacturingService::new(state.db);
    let log = service.manufacture(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// List manufacturing logs (paginated, newest first)
pub async fn list_manufacturing_logs(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<ManufacturingLog>>> {
    let service = ManufacturingService::new(state.db);
    let logs = service.list_logs(&query).await?;
    Ok(Json(logs))
}
