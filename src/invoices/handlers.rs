//! HTTP handlers for invoices
//!
//! Every handler is scoped to the signed-in user. A record that belongs to
//! someone else is reported as not found.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::core::error::{BillingResult, EntityError, QuotaError, RequestError};
use crate::core::extractors::{CurrentUser, ValidJson};
use crate::core::invoice::InvoiceRecord;
use crate::core::mapper::InvoiceDraft;
use crate::core::numbering;
use crate::core::plan::Capability;
use crate::core::query::{ListParams, PaginatedResponse};
use crate::export::document::InvoiceDocument;
use crate::server::host::{AppState, ensure_allowed};

/// Stored record alongside the form state rebuilt from it
#[derive(Debug, Serialize)]
pub struct InvoiceView {
    pub invoice: InvoiceRecord,
    pub draft: InvoiceDraft,
}

impl From<InvoiceRecord> for InvoiceView {
    fn from(invoice: InvoiceRecord) -> Self {
        let draft = invoice.to_draft();
        Self { invoice, draft }
    }
}

/// Answer to "may I open the new-invoice form?"
#[derive(Debug, Serialize)]
pub struct CreationCheck {
    pub can_create_more: bool,
    pub remaining: i64,
    pub has_invoices: bool,
}

#[derive(Debug, Serialize)]
pub struct InvoiceNumber {
    pub invoice_number: String,
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, RequestError> {
    Uuid::parse_str(raw).map_err(|_| RequestError::InvalidUuid {
        value: raw.to_string(),
    })
}

async fn load_owned(state: &AppState, owner: &Uuid, id: Uuid) -> BillingResult<InvoiceRecord> {
    state.invoices.get(owner, &id).await?.ok_or_else(|| {
        EntityError::NotFound {
            entity_type: "invoice".to_string(),
            id,
        }
        .into()
    })
}

/// GET /invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    user: CurrentUser,
    params: Result<Query<ListParams>, QueryRejection>,
) -> BillingResult<Json<PaginatedResponse<InvoiceRecord>>> {
    let Query(params) = params.map_err(|e| RequestError::InvalidQuery {
        message: e.body_text(),
    })?;

    let records = state.invoices.list_by_owner(&user.user_id).await?;
    Ok(Json(params.paginate(records)))
}

/// POST /invoices
///
/// Validate, check the quota, compute totals, store.
pub async fn create_invoice(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(draft): ValidJson<InvoiceDraft>,
) -> BillingResult<impl IntoResponse> {
    let owner = user.user_id;
    let snapshot = state.subscriptions.quota_snapshot(&owner).await;
    ensure_allowed(&owner, snapshot.plan, Capability::CreateInvoices)?;

    if !snapshot.can_create_more() {
        tracing::info!(
            user_id = %owner,
            plan = %snapshot.plan,
            invoice_count = snapshot.invoice_count,
            limit = snapshot.limit,
            "invoice quota reached"
        );
        return Err(QuotaError::LimitReached {
            plan: snapshot.plan,
            limit: snapshot.limit,
            invoice_count: snapshot.invoice_count,
        }
        .into());
    }

    let record = draft.into_record(owner, Uuid::new_v4(), Utc::now());
    let saved = state.invoices.insert(record).await?;
    tracing::info!(
        user_id = %owner,
        invoice_id = %saved.id,
        invoice_number = %saved.invoice_number,
        total = saved.total_amount,
        "invoice created"
    );

    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /invoices/quota
///
/// Checked before the form is shown. Store failures fall back to the
/// accessor defaults instead of failing the request.
pub async fn creation_check(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Json<CreationCheck> {
    let owner = user.user_id;
    let count = state.subscriptions.invoice_count(&owner).await.unwrap_or(0);

    Json(CreationCheck {
        can_create_more: state
            .subscriptions
            .can_create_more_invoices(&owner, count)
            .await,
        remaining: state.subscriptions.get_remaining_invoices(&owner).await,
        has_invoices: state.subscriptions.user_has_invoices(&owner).await,
    })
}

/// GET /invoices/new-number
pub async fn new_invoice_number(_user: CurrentUser) -> Json<InvoiceNumber> {
    Json(InvoiceNumber {
        invoice_number: numbering::generate(),
    })
}

/// GET /invoices/{id}
pub async fn get_invoice(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> BillingResult<Json<InvoiceView>> {
    let id = parse_id(&id)?;
    let record = load_owned(&state, &user.user_id, id).await?;
    Ok(Json(record.into()))
}

/// PUT /invoices/{id}
///
/// Replaces the invoice in full. `created_at` is kept; totals are recomputed.
pub async fn update_invoice(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ValidJson(draft): ValidJson<InvoiceDraft>,
) -> BillingResult<Json<InvoiceRecord>> {
    let owner = user.user_id;
    let id = parse_id(&id)?;
    state
        .require_capability(&owner, Capability::EditInvoices)
        .await?;

    let existing = load_owned(&state, &owner, id).await?;
    let record = draft.into_record(owner, id, existing.created_at);
    let saved = state.invoices.update(record).await?;
    tracing::info!(user_id = %owner, invoice_id = %id, "invoice updated");

    Ok(Json(saved))
}

/// DELETE /invoices/{id}
pub async fn delete_invoice(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> BillingResult<StatusCode> {
    let owner = user.user_id;
    let id = parse_id(&id)?;
    state
        .require_capability(&owner, Capability::DeleteInvoices)
        .await?;

    if !state.invoices.delete(&owner, &id).await? {
        return Err(EntityError::NotFound {
            entity_type: "invoice".to_string(),
            id,
        }
        .into());
    }
    tracing::info!(user_id = %owner, invoice_id = %id, "invoice deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /invoices/{id}/document
pub async fn invoice_document(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> BillingResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let record = load_owned(&state, &user.user_id, id).await?;
    let text = InvoiceDocument::from_record(&record).render_text();

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    ))
}
