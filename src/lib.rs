//! # BillFlow
//!
//! Invoicing backend with plan-gated invoice quotas.
//!
//! ## Features
//!
//! - **Invoice math**: subtotal, tax, optional discount and total computed from line items
//! - **Plans**: `free`, `pro` and `elite` with per-plan invoice limits and capabilities
//! - **Quota gate**: creation is refused at the limit, except for a user's first invoice
//! - **Export**: JSON and CSV downloads plus a printable text document per invoice
//! - **Insights**: dashboard figures and a client directory derived from invoice history
//! - **Pluggable storage**: store traits with in-memory implementations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use billflow::prelude::*;
//!
//! let sessions = SessionHub::default();
//! let session = sessions.sign_in(Uuid::new_v4())?;
//!
//! ServerBuilder::new()
//!     .with_auth_provider(sessions)
//!     .serve("127.0.0.1:3000")
//!     .await?;
//! // curl -H "Authorization: Bearer <session.token>" localhost:3000/subscription
//! ```

pub mod config;
pub mod core;
pub mod export;
pub mod insights;
pub mod invoices;
pub mod server;
pub mod storage;
pub mod subscriptions;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Domain ===
    pub use crate::core::{
        auth::{AuthContext, AuthProvider, Session, SessionEvent, SessionHub, SessionSubscription},
        error::{BillingError, BillingResult, QuotaError, StorageError, ValidationError},
        extractors::{CurrentUser, ValidJson},
        invoice::{InvoiceRecord, LineItem, Party},
        mapper::InvoiceDraft,
        money::{InvoiceTotals, format_currency},
        numbering,
        plan::{Capability, Plan, PlanRegistry, PlanTerms, plan_allows},
        quota::{QuotaNotice, QuotaSnapshot, QuotaStatus},
        service::{InvoiceStore, SubscriptionStore},
        subscription::Subscription,
    };

    // === Features ===
    pub use crate::export::{ExportFormat, document::InvoiceDocument};
    pub use crate::insights::{ClientSummary, DashboardStats};
    pub use crate::subscriptions::SubscriptionAccessor;

    // === Storage ===
    pub use crate::storage::{InMemoryInvoiceStore, InMemorySubscriptionStore};

    // === Config ===
    pub use crate::config::{ADDR_ENV, AppConfig, CONFIG_ENV};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
