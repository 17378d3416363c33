//! Bearer-token sessions.
//!
//! Login issues a random token mapped to a [`Principal`] in a TTL cache.
//! Handlers declare the identity they need through the [`UserContext`] and
//! [`AdminContext`] extractors; nothing about the caller is kept outside the
//! request.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use moka::future::Cache;
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::schemas::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

/// The identity a session token stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    cache: Cache<String, Principal>,
}

impl SessionStore {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(ttl)
            .build();
        Self { cache }
    }

    /// Starts a session and returns its token.
    pub async fn issue(&self, principal: Principal) -> SessionToken {
        let token = Uuid::new_v4().to_string();
        debug!("Issuing {:?} session for {}", principal.role, principal.username);
        self.cache.insert(token.clone(), principal).await;
        SessionToken(token)
    }

    pub async fn resolve(&self, token: &SessionToken) -> Option<Principal> {
        self.cache.get(&token.0).await
    }

    /// Ends a session. Returns false if the token was unknown or expired.
    pub async fn revoke(&self, token: &SessionToken) -> bool {
        self.cache.remove(&token.0).await.is_some()
    }
}

/// Opaque session token as sent in `Authorization: Bearer <token>`.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for SessionToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Please log in first.".to_string()))?;
        Ok(SessionToken(token.to_string()))
    }
}

/// Any live session, user or admin.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub token: SessionToken,
    pub principal: Principal,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = SessionToken::from_request_parts(parts, state).await?;
        match state.sessions.resolve(&token).await {
            Some(principal) => {
                trace!("Resolved session for {}", principal.username);
                Ok(SessionContext { token, principal })
            }
            None => {
                warn!("Rejected unknown or expired session token");
                Err(ApiError::Unauthorized("Session expired. Please log in again.".to_string()))
            }
        }
    }
}

/// A logged-in user. Admin sessions are rejected with 403.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: i32,
    pub username: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for UserContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = SessionContext::from_request_parts(parts, state).await?;
        match session.principal.role {
            Role::User => Ok(UserContext {
                user_id: session.principal.id,
                username: session.principal.username,
            }),
            Role::Admin => Err(ApiError::Forbidden("This page is for users only.".to_string())),
        }
    }
}

/// A logged-in admin. User sessions are rejected with 403.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub admin_id: i32,
    pub username: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = SessionContext::from_request_parts(parts, state).await?;
        match session.principal.role {
            Role::Admin => Ok(AdminContext {
                admin_id: session.principal.id,
                username: session.principal.username,
            }),
            Role::User => Err(ApiError::Forbidden("Admin access required.".to_string())),
        }
    }
}
