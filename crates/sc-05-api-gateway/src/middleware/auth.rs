//! Bearer authentication.
//!
//! [`Caller`] resolves the `Authorization: Bearer` token to the live
//! identity on every request, so a block or delete takes effect on the
//! next call rather than at token expiry. [`BearerToken`] only extracts
//! the raw token, for refresh where an expired token is acceptable.

use crate::domain::ApiError;
use crate::router::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use sc_02_otp_auth::LoginIdentity;
use shared_types::{Principal, UserId};

const BEARER_PREFIX: &str = "Bearer ";

/// Token from the `Authorization` header, if well formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Raw bearer token, not yet verified.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(&parts.headers)
            .map(|t| Self(t.to_string()))
            .ok_or_else(ApiError::missing_token)
    }
}

/// Authenticated caller.
#[derive(Debug, Clone)]
pub struct Caller {
    pub principal: Principal,
    pub identity: LoginIdentity,
}

impl Caller {
    pub fn id(&self) -> UserId {
        self.principal.id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(ApiError::missing_token)?;
        let identity = state.auth.verify_token(token)?;
        Ok(Self {
            principal: identity.principal(),
            identity,
        })
    }
}
