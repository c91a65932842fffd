//! BillFlow API server
//!
//! ```text
//! BILLFLOW_CONFIG=billflow.yaml BILLFLOW_ADDR=0.0.0.0:8080 cargo run
//! ```

use billflow::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    let sessions = SessionHub::default();
    config.seed_sessions(&sessions)?;
    if !config.sessions.is_empty() {
        tracing::info!(count = config.sessions.len(), "dev sessions registered");
    }

    let addr = std::env::var(ADDR_ENV).unwrap_or_else(|_| config.bind_addr());

    ServerBuilder::new()
        .with_invoice_store(InMemoryInvoiceStore::new())
        .with_subscription_store(InMemorySubscriptionStore::new())
        .with_plan_registry(config.plan_registry())
        .with_auth_provider(sessions)
        .serve(&addr)
        .await
}
