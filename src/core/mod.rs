//! Domain types, business rules and the seams to external collaborators

pub mod auth;
pub mod error;
pub mod extractors;
pub mod invoice;
pub mod mapper;
pub mod money;
pub mod numbering;
pub mod plan;
pub mod query;
pub mod quota;
pub mod service;
pub mod subscription;

pub use auth::{AuthContext, AuthProvider, Session, SessionEvent, SessionHub};
pub use error::{BillingError, BillingResult};
pub use extractors::{CurrentUser, ValidJson};
pub use invoice::{InvoiceRecord, LineItem, Party};
pub use mapper::InvoiceDraft;
pub use money::InvoiceTotals;
pub use plan::{Capability, Plan, PlanRegistry, PlanTerms, plan_allows};
pub use quota::{QuotaNotice, QuotaSnapshot, QuotaStatus};
pub use service::{InvoiceStore, SubscriptionStore};
pub use subscription::Subscription;
