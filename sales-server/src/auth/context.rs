//! Request authentication context
//!
//! Extracts the caller's identity from the `Authorization` header.
//! Unlike a guard, extraction itself never fails: a missing or invalid
//! token yields an empty context, and handlers that need an identity get
//! `NotAuthenticated` from [`AuthContext::seller_id`] at the point of
//! use. Public endpoints simply never ask.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

use crate::auth::{Claims, JwtService};
use crate::core::ServerState;
use shared::error::{AppError, AppResult};

/// Caller identity for one request, possibly empty
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    claims: Option<Claims>,
}

impl AuthContext {
    /// Context for a validated token
    pub fn authenticated(claims: Claims) -> Self {
        Self {
            claims: Some(claims),
        }
    }

    /// Context for an anonymous request
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.claims.is_some()
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    /// The validated claims, or `NotAuthenticated`
    pub fn current(&self) -> AppResult<&Claims> {
        self.claims
            .as_ref()
            .ok_or_else(AppError::not_authenticated)
    }

    /// The acting seller's user ID, or `NotAuthenticated`
    pub fn seller_id(&self) -> AppResult<i64> {
        self.current().map(|claims| claims.sub)
    }
}

impl FromRequestParts<ServerState> for AuthContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted for this request
        if let Some(context) = parts.extensions.get::<AuthContext>() {
            return Ok(context.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let context = match auth_header.and_then(JwtService::extract_from_header) {
            Some(token) => match state.jwt_service().validate_token(token) {
                Ok(claims) => AuthContext::authenticated(claims),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        uri = %parts.uri,
                        "rejected bearer token, continuing unauthenticated"
                    );
                    AuthContext::empty()
                }
            },
            None => AuthContext::empty(),
        };

        // Store in extensions for potential reuse
        parts.extensions.insert(context.clone());

        Ok(context)
    }
}
