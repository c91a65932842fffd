//! Session resolution and sign-in/sign-out notifications
//!
//! Requests carry `Authorization: Bearer <token>`. An [`AuthProvider`] turns
//! the headers into an [`AuthContext`]. [`SessionHub`] is the in-process
//! provider: it keeps the live sessions and broadcasts a [`SessionEvent`]
//! every time one starts or ends.
//!
//! ```rust,ignore
//! let hub = SessionHub::default();
//! let mut sub = hub.subscribe();
//!
//! let session = hub.sign_in(user_id)?;
//! assert!(matches!(sub.recv().await, Some(SessionEvent::SignedIn { .. })));
//!
//! drop(sub); // unsubscribes
//! ```

use crate::core::error::AuthError;
use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Who is making the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Signed-in user
    User { user_id: Uuid },

    /// No session on the request
    Anonymous,
}

impl AuthContext {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AuthContext::User { user_id } => Some(*user_id),
            AuthContext::Anonymous => None,
        }
    }
}

/// Resolves the caller from request headers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// `Anonymous` when no credentials are present, an error when they are
    /// present but unusable
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError>;
}

/// Pull the bearer token out of the `Authorization` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// A live session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Session lifecycle notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    SignedIn { user_id: Uuid },
    SignedOut { user_id: Uuid },
}

/// Receiving half of a [`SessionHub`] subscription
///
/// Dropping it unsubscribes.
#[derive(Debug)]
pub struct SessionSubscription {
    receiver: broadcast::Receiver<SessionEvent>,
}

impl SessionSubscription {
    /// Next event, or `None` once the hub is gone
    ///
    /// A subscriber that falls behind skips the events it missed.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "session subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// In-process session registry
///
/// Cheap to clone; clones share the same sessions and channel.
#[derive(Debug, Clone)]
pub struct SessionHub {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            sender,
        }
    }

    /// Start a session with a freshly generated token
    pub fn sign_in(&self, user_id: Uuid) -> Result<Session, AuthError> {
        self.register(Uuid::new_v4().simple().to_string(), user_id)
    }

    /// Start a session under a known token (used for configured dev sessions)
    pub fn register(&self, token: impl Into<String>, user_id: Uuid) -> Result<Session, AuthError> {
        let session = Session {
            token: token.into(),
            user_id,
            created_at: Utc::now(),
        };

        self.sessions
            .write()
            .map_err(|_| AuthError::SessionStoreUnavailable)?
            .insert(session.token.clone(), session.clone());

        tracing::info!(user_id = %user_id, "session started");
        self.publish(SessionEvent::SignedIn { user_id });
        Ok(session)
    }

    /// End a session; `false` if the token was unknown
    pub fn sign_out(&self, token: &str) -> Result<bool, AuthError> {
        let removed = self
            .sessions
            .write()
            .map_err(|_| AuthError::SessionStoreUnavailable)?
            .remove(token);

        match removed {
            Some(session) => {
                tracing::info!(user_id = %session.user_id, "session ended");
                self.publish(SessionEvent::SignedOut {
                    user_id: session.user_id,
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn resolve(&self, token: &str) -> Result<Option<Session>, AuthError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| AuthError::SessionStoreUnavailable)?;
        Ok(sessions.get(token).cloned())
    }

    /// Receive every session event from now on
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn publish(&self, event: SessionEvent) -> usize {
        // no subscribers is fine
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl AuthProvider for SessionHub {
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
        let Some(token) = bearer_token(headers) else {
            return Ok(AuthContext::Anonymous);
        };

        match self.resolve(token)? {
            Some(session) => Ok(AuthContext::User {
                user_id: session.user_id,
            }),
            None => Err(AuthError::InvalidSession),
        }
    }
}
