//! Dashboard and client directory endpoints

use axum::{Json, extract::State};
use chrono::Utc;

use super::{ClientSummary, DashboardStats, client_directory};
use crate::core::error::BillingResult;
use crate::core::extractors::CurrentUser;
use crate::server::host::AppState;

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> BillingResult<Json<DashboardStats>> {
    let records = state.invoices.list_by_owner(&user.user_id).await?;
    let snapshot = state.subscriptions.quota_snapshot(&user.user_id).await;
    Ok(Json(DashboardStats::compute(
        &records,
        &snapshot,
        Utc::now().date_naive(),
    )))
}

/// GET /clients
pub async fn clients(
    State(state): State<AppState>,
    user: CurrentUser,
) -> BillingResult<Json<Vec<ClientSummary>>> {
    let records = state.invoices.list_by_owner(&user.user_id).await?;
    Ok(Json(client_directory(&records)))
}
