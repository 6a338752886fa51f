//! HTTP handler for the dashboard snapshot

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::dashboard::{DashboardService, DashboardSnapshot};
use crate::AppState;

/// Get the dashboard snapshot: ledger totals, low-stock watchlists,
/// and today's trading figures
pub async fn get_dashboard(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<DashboardSnapshot>> {
    let service = DashboardService::new(state.db);
    let snapshot = service.snapshot().await?;
    Ok(Json(snapshot))
}
