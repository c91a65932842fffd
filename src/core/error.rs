//! Typed error handling for the billing service
//!
//! Every failure a request can hit is one of the categories below. Each
//! category knows its HTTP status and a stable error code, so handlers can
//! return `Result<_, BillingError>` and let [`IntoResponse`] do the rest.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: a required field is empty or malformed
//! - [`QuotaError`]: the plan does not allow the operation
//! - [`StorageError`]: the persistence collaborator failed
//! - [`AuthError`]: no usable session on the request
//! - [`EntityError`]: a record does not exist for this owner
//! - [`RequestError`]: malformed path or query input
//! - [`ExportError`]: nothing to export, or the export could not be encoded
//! - [`ConfigError`]: configuration could not be loaded (startup only)
//!
//! # Example
//!
//! ```rust,ignore
//! match accessor_result {
//!     Err(BillingError::Quota(QuotaError::LimitReached { limit, .. })) => {
//!         println!("upgrade needed, limit is {}", limit);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//!     Ok(record) => println!("created {}", record.invoice_number),
//! }
//! ```

use crate::core::plan::{Capability, Plan};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the billing service
#[derive(Debug, Error)]
pub enum BillingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Quota(#[from] QuotaError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl BillingError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BillingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BillingError::Quota(_) => StatusCode::FORBIDDEN,
            BillingError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BillingError::Auth(_) => StatusCode::UNAUTHORIZED,
            BillingError::Entity(_) => StatusCode::NOT_FOUND,
            BillingError::Request(_) => StatusCode::BAD_REQUEST,
            BillingError::Export(e) => e.status_code(),
            BillingError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BillingError::Validation(_) => "VALIDATION_ERROR",
            BillingError::Quota(e) => e.error_code(),
            BillingError::Storage(_) => "STORAGE_ERROR",
            BillingError::Auth(_) => "UNAUTHORIZED",
            BillingError::Entity(_) => "ENTITY_NOT_FOUND",
            BillingError::Request(e) => e.error_code(),
            BillingError::Export(e) => e.error_code(),
            BillingError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Storage failures get a generic message; the cause is only
    /// written to the log.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            BillingError::Storage(_) => {
                "Something went wrong while saving or loading your data. Please try again."
                    .to_string()
            }
            other => other.to_string(),
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            BillingError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            BillingError::Quota(QuotaError::LimitReached {
                plan,
                limit,
                invoice_count,
            }) => Some(serde_json::json!({
                "plan": plan,
                "limit": limit,
                "invoice_count": invoice_count,
                "upgrade_url": "/pricing"
            })),
            BillingError::Quota(QuotaError::CapabilityDenied { plan, capability }) => {
                Some(serde_json::json!({
                    "plan": plan,
                    "capability": capability,
                    "upgrade_url": "/pricing"
                }))
            }
            BillingError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for BillingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "request rejected");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Validation errors: {}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        flatten_validation_errors("", &errors, &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for BillingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        BillingError::Validation(errors.into())
    }
}

/// Nested structs and lists are reported as dotted paths (`client.email`,
/// `line_items[2].description`).
fn flatten_validation_errors(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<FieldValidationError>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .clone()
                        .unwrap_or_else(|| Cow::Owned(format!("failed '{}' check", err.code)));
                    out.push(FieldValidationError {
                        field: path.clone(),
                        message: message.into_owned(),
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                flatten_validation_errors(&path, inner, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_validation_errors(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

// =============================================================================
// Quota Errors
// =============================================================================

/// The subscription plan refuses the operation
///
/// Both variants point the user at the pricing page. The top tier is no
/// exception: an elite user at the limit is also told to upgrade.
#[derive(Debug, Error)]
pub enum QuotaError {
    #[error("You've reached your limit of {limit} invoices for your {plan} plan.")]
    LimitReached {
        plan: Plan,
        limit: i64,
        invoice_count: i64,
    },

    #[error("Your {plan} plan does not include {capability}. Upgrade your plan to unlock it.")]
    CapabilityDenied { plan: Plan, capability: Capability },
}

impl QuotaError {
    pub fn error_code(&self) -> &'static str {
        match self {
            QuotaError::LimitReached { .. } => "QUOTA_EXCEEDED",
            QuotaError::CapabilityDenied { .. } => "PLAN_UPGRADE_REQUIRED",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by a persistence backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{backend} lock poisoned")]
    LockPoisoned { backend: &'static str },

    #[error("{table} row '{id}' not found")]
    RowNotFound { table: &'static str, id: String },

    #[error("{backend} error: {message}")]
    Backend { backend: String, message: String },
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors related to the caller's session
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingSession,

    #[error("Session is invalid or has expired")]
    InvalidSession,

    #[error("Session store unavailable")]
    SessionStoreUnavailable,
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to record lookups
#[derive(Debug, Error)]
pub enum EntityError {
    /// Also returned when the record belongs to somebody else
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: Uuid },
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors caused by malformed request input
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid UUID format: {value}")]
    InvalidUuid { value: String },

    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    #[error("Export format '{format}' is not supported")]
    UnsupportedExportFormat { format: String },
}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidUuid { .. } => "INVALID_UUID",
            RequestError::InvalidQuery { .. } => "INVALID_QUERY",
            RequestError::UnsupportedExportFormat { .. } => "UNSUPPORTED_EXPORT_FORMAT",
        }
    }
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors produced while exporting invoice data
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No invoices to export")]
    NoInvoices,

    #[error("Failed to encode export: {message}")]
    Encoding { message: String },
}

impl ExportError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExportError::NoInvoices => StatusCode::NOT_FOUND,
            ExportError::Encoding { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ExportError::NoInvoices => "NO_INVOICES",
            ExportError::Encoding { .. } => "EXPORT_ENCODING_ERROR",
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Encoding {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<uuid::Error> for RequestError {
    fn from(err: uuid::Error) -> Self {
        RequestError::InvalidUuid {
            value: err.to_string(),
        }
    }
}

/// A specialized Result type for billing operations
pub type BillingResult<T> = Result<T, BillingError>;
