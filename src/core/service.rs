//! Persistence traits for invoices and subscriptions
//!
//! Implementations own the storage mechanism. Callers only see
//! [`StorageError`] and never learn which backend failed beyond its name.

use crate::core::error::StorageError;
use crate::core::invoice::InvoiceRecord;
use crate::core::plan::Plan;
use crate::core::subscription::Subscription;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Invoice rows, always scoped to an owner
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Owner's invoices, newest `created_at` first
    async fn list_by_owner(&self, owner: &Uuid) -> Result<Vec<InvoiceRecord>, StorageError>;

    async fn count_by_owner(&self, owner: &Uuid) -> Result<i64, StorageError>;

    /// `None` if the row is missing or belongs to someone else
    async fn get(&self, owner: &Uuid, id: &Uuid) -> Result<Option<InvoiceRecord>, StorageError>;

    async fn insert(&self, record: InvoiceRecord) -> Result<InvoiceRecord, StorageError>;

    /// Replace a row in full; last write wins
    async fn update(&self, record: InvoiceRecord) -> Result<InvoiceRecord, StorageError>;

    /// Returns `false` if there was nothing to delete
    async fn delete(&self, owner: &Uuid, id: &Uuid) -> Result<bool, StorageError>;
}

/// Subscription rows, one per user
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn find_by_owner(&self, owner: &Uuid) -> Result<Option<Subscription>, StorageError>;

    async fn insert(&self, subscription: Subscription) -> Result<Subscription, StorageError>;

    async fn update_plan(
        &self,
        owner: &Uuid,
        plan: Plan,
        updated_at: DateTime<Utc>,
    ) -> Result<Subscription, StorageError>;
}
