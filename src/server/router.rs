//! Route table

use axum::{
    Json, Router,
    routing::{get, put},
};
use serde_json::{Value, json};

use super::host::AppState;
use crate::export::handlers::export_invoices;
use crate::insights::handlers::{clients, dashboard};
use crate::invoices::handlers::{
    create_invoice, creation_check, delete_invoice, get_invoice, invoice_document, list_invoices,
    new_invoice_number, update_invoice,
};
use crate::subscriptions::handlers::{get_subscription, list_plans, update_subscription};

/// Routes that need a signed-in user
///
/// - GET /plans
/// - GET, POST /invoices
/// - GET /invoices/new-number
/// - GET /invoices/quota
/// - GET, PUT, DELETE /invoices/{id}
/// - GET /invoices/{id}/document
/// - GET /export
/// - GET, PUT /subscription
/// - GET /dashboard
/// - GET /clients
pub fn build_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/new-number", get(new_invoice_number))
        .route("/invoices/quota", get(creation_check))
        .route(
            "/invoices/{id}",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .route("/invoices/{id}/document", get(invoice_document))
        .route("/export", get(export_invoices))
        .route("/subscription", put(update_subscription).get(get_subscription))
        .route("/dashboard", get(dashboard))
        .route("/clients", get(clients))
        .with_state(state)
}

pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "billflow"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check_body() {
        let response = health_routes()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["service"], "billflow");
    }

    #[tokio::test]
    async fn test_api_routes_require_a_session() {
        let state = crate::server::ServerBuilder::new().build_state();
        let response = tokio_test::assert_ok!(
            build_api_routes(state)
                .oneshot(Request::get("/dashboard").body(Body::empty()).unwrap())
                .await
        );
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
