//! In-memory stores for development and tests

use crate::core::error::StorageError;
use crate::core::invoice::InvoiceRecord;
use crate::core::plan::Plan;
use crate::core::service::{InvoiceStore, SubscriptionStore};
use crate::core::subscription::Subscription;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

const BACKEND: &str = "in_memory";

/// Invoice rows keyed by id
///
/// Uses RwLock for thread-safe access. A poisoned lock surfaces as
/// [`StorageError::LockPoisoned`].
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<Uuid, InvoiceRecord>>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn list_by_owner(&self, owner: &Uuid) -> Result<Vec<InvoiceRecord>, StorageError> {
        let invoices = self
            .invoices
            .read()
            .map_err(|_| StorageError::LockPoisoned { backend: BACKEND })?;

        let mut owned: Vec<InvoiceRecord> = invoices
            .values()
            .filter(|r| r.is_owned_by(owner))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn count_by_owner(&self, owner: &Uuid) -> Result<i64, StorageError> {
        let invoices = self
            .invoices
            .read()
            .map_err(|_| StorageError::LockPoisoned { backend: BACKEND })?;

        Ok(invoices.values().filter(|r| r.is_owned_by(owner)).count() as i64)
    }

    async fn get(&self, owner: &Uuid, id: &Uuid) -> Result<Option<InvoiceRecord>, StorageError> {
        let invoices = self
            .invoices
            .read()
            .map_err(|_| StorageError::LockPoisoned { backend: BACKEND })?;

        Ok(invoices.get(id).filter(|r| r.is_owned_by(owner)).cloned())
    }

    async fn insert(&self, record: InvoiceRecord) -> Result<InvoiceRecord, StorageError> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|_| StorageError::LockPoisoned { backend: BACKEND })?;

        invoices.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: InvoiceRecord) -> Result<InvoiceRecord, StorageError> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|_| StorageError::LockPoisoned { backend: BACKEND })?;

        match invoices.get_mut(&record.id) {
            Some(existing) if existing.is_owned_by(&record.user_id) => {
                *existing = record.clone();
                Ok(record)
            }
            _ => Err(StorageError::RowNotFound {
                table: "invoices",
                id: record.id.to_string(),
            }),
        }
    }

    async fn delete(&self, owner: &Uuid, id: &Uuid) -> Result<bool, StorageError> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|_| StorageError::LockPoisoned { backend: BACKEND })?;

        if invoices.get(id).is_some_and(|r| r.is_owned_by(owner)) {
            invoices.remove(id);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Subscription rows keyed by user
#[derive(Clone, Default)]
pub struct InMemorySubscriptionStore {
    subscriptions: Arc<RwLock<HashMap<Uuid, Subscription>>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn find_by_owner(&self, owner: &Uuid) -> Result<Option<Subscription>, StorageError> {
        let subscriptions = self
            .subscriptions
            .read()
            .map_err(|_| StorageError::LockPoisoned { backend: BACKEND })?;

        Ok(subscriptions.get(owner).cloned())
    }

    async fn insert(&self, subscription: Subscription) -> Result<Subscription, StorageError> {
        let mut subscriptions = self
            .subscriptions
            .write()
            .map_err(|_| StorageError::LockPoisoned { backend: BACKEND })?;

        subscriptions.insert(subscription.user_id, subscription.clone());
        Ok(subscription)
    }

    async fn update_plan(
        &self,
        owner: &Uuid,
        plan: Plan,
        updated_at: DateTime<Utc>,
    ) -> Result<Subscription, StorageError> {
        let mut subscriptions = self
            .subscriptions
            .write()
            .map_err(|_| StorageError::LockPoisoned { backend: BACKEND })?;

        let row = subscriptions
            .get_mut(owner)
            .ok_or_else(|| StorageError::RowNotFound {
                table: "subscriptions",
                id: owner.to_string(),
            })?;
        row.plan = plan;
        row.updated_at = updated_at;
        Ok(row.clone())
    }
}
