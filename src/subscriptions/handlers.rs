//! HTTP handlers for plans and the user's subscription

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::error::{BillingResult, StorageError};
use crate::core::extractors::{CurrentUser, ValidJson};
use crate::core::plan::{Capability, Plan};
use crate::core::quota::{QuotaNotice, QuotaSnapshot};
use crate::server::host::AppState;

#[derive(Debug, Serialize)]
pub struct PlanView {
    pub plan: Plan,
    pub invoice_limit: i64,
    pub monthly_price: u32,
    pub capabilities: Vec<Capability>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub quota: QuotaSnapshot,
    pub can_create_more: bool,
    pub notice: Option<QuotaNotice>,
}

impl From<QuotaSnapshot> for SubscriptionView {
    fn from(quota: QuotaSnapshot) -> Self {
        Self {
            can_create_more: quota.can_create_more(),
            notice: quota.notice(),
            quota,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PlanChange {
    pub plan: Plan,
}

/// GET /plans
pub async fn list_plans(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Json<Vec<PlanView>> {
    let plans = state
        .registry()
        .entries()
        .into_iter()
        .map(|(plan, terms)| PlanView {
            plan,
            invoice_limit: terms.invoice_limit,
            monthly_price: terms.monthly_price,
            capabilities: Capability::ALL
                .into_iter()
                .filter(|c| plan.allows(*c))
                .collect(),
        })
        .collect();
    Json(plans)
}

/// GET /subscription
pub async fn get_subscription(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Json<SubscriptionView> {
    let snapshot = state.subscriptions.quota_snapshot(&user.user_id).await;
    Json(snapshot.into())
}

/// PUT /subscription
pub async fn update_subscription(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidJson(change): ValidJson<PlanChange>,
) -> BillingResult<Json<SubscriptionView>> {
    if !state
        .subscriptions
        .update_user_plan(&user.user_id, change.plan)
        .await
    {
        return Err(StorageError::Backend {
            backend: "subscriptions".to_string(),
            message: "plan update was not saved".to_string(),
        }
        .into());
    }

    let snapshot = state.subscriptions.quota_snapshot(&user.user_id).await;
    Ok(Json(snapshot.into()))
}
