//! Plan and quota lookups for a user
//!
//! Every read here fails open: a store error is logged and the caller gets
//! the `free` plan or a zero count instead of an error.

use crate::core::plan::{Plan, PlanRegistry};
use crate::core::quota::{self, QuotaSnapshot};
use crate::core::service::{InvoiceStore, SubscriptionStore};
use crate::core::subscription::Subscription;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct SubscriptionAccessor {
    subscriptions: Arc<dyn SubscriptionStore>,
    invoices: Arc<dyn InvoiceStore>,
    registry: PlanRegistry,
}

impl SubscriptionAccessor {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionStore>,
        invoices: Arc<dyn InvoiceStore>,
        registry: PlanRegistry,
    ) -> Self {
        Self {
            subscriptions,
            invoices,
            registry,
        }
    }

    pub fn registry(&self) -> &PlanRegistry {
        &self.registry
    }

    /// The user's plan; `free` when there is no row or the lookup fails
    pub async fn get_user_plan(&self, owner: &Uuid) -> Plan {
        match self.subscriptions.find_by_owner(owner).await {
            Ok(Some(subscription)) => subscription.plan,
            Ok(None) => Plan::Free,
            Err(e) => {
                tracing::warn!(user_id = %owner, error = %e, "plan lookup failed, assuming free");
                Plan::Free
            }
        }
    }

    /// Upsert the user's plan; `false` if the store refused
    pub async fn update_user_plan(&self, owner: &Uuid, plan: Plan) -> bool {
        let result = match self.subscriptions.find_by_owner(owner).await {
            Ok(Some(_)) => self
                .subscriptions
                .update_plan(owner, plan, Utc::now())
                .await,
            Ok(None) => {
                self.subscriptions
                    .insert(Subscription::new(*owner, plan))
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(_) => {
                tracing::info!(user_id = %owner, plan = %plan, "plan updated");
                true
            }
            Err(e) => {
                tracing::error!(user_id = %owner, plan = %plan, error = %e, "plan update failed");
                false
            }
        }
    }

    /// Number of invoices the user holds, or `None` if it could not be read
    pub async fn invoice_count(&self, owner: &Uuid) -> Option<i64> {
        match self.invoices.count_by_owner(owner).await {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!(user_id = %owner, error = %e, "invoice count failed");
                None
            }
        }
    }

    /// `limit − count`, possibly negative; 0 when the count cannot be read
    pub async fn get_remaining_invoices(&self, owner: &Uuid) -> i64 {
        let Some(count) = self.invoice_count(owner).await else {
            return 0;
        };
        let plan = self.get_user_plan(owner).await;
        self.registry.limit(plan) - count
    }

    pub async fn user_has_invoices(&self, owner: &Uuid) -> bool {
        self.invoice_count(owner).await.is_some_and(|n| n > 0)
    }

    pub async fn can_create_more_invoices(&self, owner: &Uuid, current_count: i64) -> bool {
        let plan = self.get_user_plan(owner).await;
        quota::can_create_more(current_count, self.registry.limit(plan))
    }

    pub async fn quota_snapshot(&self, owner: &Uuid) -> QuotaSnapshot {
        let plan = self.get_user_plan(owner).await;
        let count = self.invoice_count(owner).await.unwrap_or(0);
        QuotaSnapshot::new(plan, &self.registry, count)
    }
}
