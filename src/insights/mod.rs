//! Read-only views derived from a user's invoices

pub mod clients;
pub mod dashboard;
pub mod handlers;

pub use clients::{ClientSummary, client_directory};
pub use dashboard::DashboardStats;
