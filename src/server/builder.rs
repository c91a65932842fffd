//! ServerBuilder for wiring stores, plans and sessions into a router

use super::host::AppState;
use super::router::{build_api_routes, health_routes};
use crate::core::auth::{AuthProvider, SessionHub};
use crate::core::plan::PlanRegistry;
use crate::core::service::{InvoiceStore, SubscriptionStore};
use crate::storage::{InMemoryInvoiceStore, InMemorySubscriptionStore};
use crate::subscriptions::accessor::SubscriptionAccessor;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the HTTP server
///
/// Anything not set falls back to the in-memory stores, the built-in plan
/// table and a fresh [`SessionHub`].
///
/// # Example
///
/// ```ignore
/// let sessions = SessionHub::default();
/// let app = ServerBuilder::new()
///     .with_plan_registry(config.plan_registry())
///     .with_auth_provider(sessions.clone())
///     .build()?;
/// ```
pub struct ServerBuilder {
    invoice_store: Option<Arc<dyn InvoiceStore>>,
    subscription_store: Option<Arc<dyn SubscriptionStore>>,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    registry: PlanRegistry,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            invoice_store: None,
            subscription_store: None,
            auth_provider: None,
            registry: PlanRegistry::default(),
            custom_routes: Vec::new(),
        }
    }

    pub fn with_invoice_store(mut self, store: impl InvoiceStore + 'static) -> Self {
        self.invoice_store = Some(Arc::new(store));
        self
    }

    pub fn with_subscription_store(mut self, store: impl SubscriptionStore + 'static) -> Self {
        self.subscription_store = Some(Arc::new(store));
        self
    }

    pub fn with_auth_provider(mut self, provider: impl AuthProvider + 'static) -> Self {
        self.auth_provider = Some(Arc::new(provider));
        self
    }

    pub fn with_plan_registry(mut self, registry: PlanRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Extra routes merged next to the API, e.g. a sign-in endpoint
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    pub fn build_state(&mut self) -> AppState {
        let invoices = self
            .invoice_store
            .take()
            .unwrap_or_else(|| Arc::new(InMemoryInvoiceStore::new()));
        let subscriptions = self
            .subscription_store
            .take()
            .unwrap_or_else(|| Arc::new(InMemorySubscriptionStore::new()));
        let auth = self
            .auth_provider
            .take()
            .unwrap_or_else(|| Arc::new(SessionHub::default()));

        AppState {
            subscriptions: SubscriptionAccessor::new(
                subscriptions,
                invoices.clone(),
                self.registry.clone(),
            ),
            invoices,
            auth,
        }
    }

    /// Build the router with tracing and permissive CORS
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state();
        let mut app = health_routes().merge(build_api_routes(state));
        for custom in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom);
        }

        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
    }

    /// Serve with graceful shutdown on SIGTERM and Ctrl+C
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
///
/// If a handler cannot be installed, that signal is ignored and the other
/// one still works.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_builtin_plans() {
        let builder = ServerBuilder::new();
        assert!(builder.invoice_store.is_none());
        assert!(builder.subscription_store.is_none());
        assert!(builder.auth_provider.is_none());
        assert_eq!(builder.registry, PlanRegistry::default());
    }

    #[test]
    fn test_build_state_fills_defaults() {
        let mut builder = ServerBuilder::default();
        let state = builder.build_state();
        assert_eq!(state.registry().limit(crate::core::plan::Plan::Free), 5);
    }

    #[test]
    fn test_with_custom_routes_appends_router() {
        let builder = ServerBuilder::new().with_custom_routes(Router::new());
        assert_eq!(builder.custom_routes.len(), 1);
    }

    #[tokio::test]
    async fn test_build_produces_router() {
        let app = ServerBuilder::new()
            .with_invoice_store(InMemoryInvoiceStore::new())
            .with_subscription_store(InMemorySubscriptionStore::new())
            .with_auth_provider(SessionHub::default())
            .build();
        assert!(app.is_ok());
    }
}
