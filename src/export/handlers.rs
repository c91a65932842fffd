//! Download endpoint for invoice exports

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;

use super::{ExportFormat, export, export_filename};
use crate::core::error::BillingResult;
use crate::core::extractors::CurrentUser;
use crate::core::plan::Capability;
use crate::server::host::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "json".to_string()
}

/// GET /export?format=json|csv
pub async fn export_invoices(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ExportParams>,
) -> BillingResult<impl IntoResponse> {
    let format: ExportFormat = params.format.parse()?;
    state
        .require_capability(&user.user_id, Capability::ExportData)
        .await?;

    let records = state.invoices.list_by_owner(&user.user_id).await?;
    let body = export(&records, format)?;
    let filename = export_filename(format, Utc::now().date_naive());
    tracing::info!(
        user_id = %user.user_id,
        format = format.extension(),
        count = records.len(),
        "invoices exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}
