//! API error type and its HTTP mapping.
//!
//! Every subsystem error arrives here through its `kind()`; the kind alone
//! picks the status code, so the same failure maps identically on every
//! route.
//!
//! | Kinds | Status |
//! |-------|--------|
//! | `ValidationError`, OTP failures, `InsufficientStock`, `NotMapped`, `NothingToClaim` | 400 |
//! | `TokenInvalid`, `TokenExpired` | 401 |
//! | `NotAuthorized`, `AccountBlocked`, `AccountDeleted` | 403 |
//! | `UserNotFound`, `NotFound` | 404 |
//! | `Conflict`, `AlreadyMapped`, `AlreadyProcessed` | 409 |
//! | `RateLimited`, `QuotaExceeded` | 429 |
//! | `Internal` | 500 |

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sc_01_identity::IdentityError;
use sc_02_otp_auth::AuthError;
use sc_03_stock_ledger::LedgerError;
use sc_04_rewards::RewardError;
use serde_json::{json, Value};
use shared_types::{ErrorKind, ValidationError};
use std::fmt;

/// Error returned by every handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    /// Optional structured detail (wait time, remaining attempts, ...)
    pub data: Option<Value>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn missing_token() -> Self {
        Self::new(ErrorKind::TokenInvalid, "No token provided")
    }

    pub fn validation(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, details)
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, details)
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.kind)
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::ValidationError
        | ErrorKind::OtpNotFound
        | ErrorKind::OtpExpired
        | ErrorKind::InvalidOtp
        | ErrorKind::AttemptsExhausted
        | ErrorKind::InsufficientStock
        | ErrorKind::NotMapped
        | ErrorKind::NothingToClaim => StatusCode::BAD_REQUEST,
        ErrorKind::TokenInvalid | ErrorKind::TokenExpired => StatusCode::UNAUTHORIZED,
        ErrorKind::NotAuthorized | ErrorKind::AccountBlocked | ErrorKind::AccountDeleted => {
            StatusCode::FORBIDDEN
        }
        ErrorKind::UserNotFound | ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict | ErrorKind::AlreadyMapped | ErrorKind::AlreadyProcessed => {
            StatusCode::CONFLICT
        }
        ErrorKind::RateLimited | ErrorKind::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        steel_telemetry::record_api_error(self.kind.as_str());
        if status.is_server_error() {
            tracing::error!(subsystem = "api-gateway", kind = %self.kind, error = %self.message, "Request failed");
        } else {
            tracing::debug!(subsystem = "api-gateway", kind = %self.kind, error = %self.message, "Request rejected");
        }

        let mut body = json!({
            "success": false,
            "error": self.message,
            "kind": self.kind,
        });
        if let (Some(data), Some(obj)) = (self.data, body.as_object_mut()) {
            obj.insert("data".to_string(), data);
        }
        (status, axum::Json(body)).into_response()
    }
}

// --- subsystem conversions ---

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let api = Self::new(err.kind(), err.to_string());
        match err {
            AuthError::RateLimited { wait_secs } => api.with_data(json!({ "waitSeconds": wait_secs })),
            AuthError::QuotaExceeded { limit } => api.with_data(json!({ "limit": limit })),
            AuthError::InvalidOtp { remaining_attempts } => {
                api.with_data(json!({ "remainingAttempts": remaining_attempts }))
            }
            _ => api,
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let api = Self::new(err.kind(), err.to_string());
        match err {
            LedgerError::InsufficientStock {
                available,
                requested,
            } => api.with_data(json!({ "available": available, "requested": requested })),
            LedgerError::AlreadyProcessed { status, .. } => {
                api.with_data(json!({ "status": status }))
            }
            _ => api,
        }
    }
}

impl From<RewardError> for ApiError {
    fn from(err: RewardError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

// --- extractor rejections ---

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

/// Gateway-level errors (startup and serving, never sent to clients)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    /// Server socket bind error
    #[error("server bind error on {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    /// Server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(std::io::Error),
}
