//! Axum extractors for the signed-in user and validated JSON bodies

use crate::core::auth::{AuthContext, AuthProvider};
use crate::core::error::{AuthError, BillingError, ValidationError};
use axum::Json;
use axum::extract::{FromRef, FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// The authenticated caller
///
/// Rejects with 401 when the request has no session or an unknown one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Arc<dyn AuthProvider>: FromRef<S>,
{
    type Rejection = BillingError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let provider = Arc::<dyn AuthProvider>::from_ref(state);

        match provider.extract_context(&parts.headers).await? {
            AuthContext::User { user_id } => Ok(CurrentUser { user_id }),
            AuthContext::Anonymous => Err(AuthError::MissingSession.into()),
        }
    }
}

/// JSON body that has passed its `validator` rules
///
/// Malformed JSON and failed rules both reject with 422.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = BillingError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            ValidationError::InvalidJson {
                message: e.body_text(),
            }
        })?;

        value.validate()?;
        Ok(ValidJson(value))
    }
}
