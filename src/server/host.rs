//! Shared application state handed to every handler

use crate::core::auth::AuthProvider;
use crate::core::error::{BillingResult, QuotaError};
use crate::core::plan::{Capability, Plan, PlanRegistry, plan_allows};
use crate::core::service::InvoiceStore;
use crate::subscriptions::accessor::SubscriptionAccessor;
use axum::extract::FromRef;
use std::sync::Arc;
use uuid::Uuid;

/// Everything a request may touch
///
/// Cheap to clone; all collaborators sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub invoices: Arc<dyn InvoiceStore>,
    pub subscriptions: SubscriptionAccessor,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    pub fn registry(&self) -> &PlanRegistry {
        self.subscriptions.registry()
    }

    /// The caller's plan if it grants `capability`, otherwise an upgrade error
    pub async fn require_capability(
        &self,
        owner: &Uuid,
        capability: Capability,
    ) -> BillingResult<Plan> {
        let plan = self.subscriptions.get_user_plan(owner).await;
        ensure_allowed(owner, plan, capability)?;
        Ok(plan)
    }
}

/// Check an already-resolved plan against `capability`
pub fn ensure_allowed(owner: &Uuid, plan: Plan, capability: Capability) -> BillingResult<()> {
    if plan_allows(plan, capability) {
        Ok(())
    } else {
        tracing::debug!(user_id = %owner, plan = %plan, %capability, "capability denied");
        Err(QuotaError::CapabilityDenied { plan, capability }.into())
    }
}

impl FromRef<AppState> for Arc<dyn AuthProvider> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
