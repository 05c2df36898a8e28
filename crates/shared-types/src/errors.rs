//! # Error Types
//!
//! Defines the error kinds surfaced to callers across subsystems, plus the
//! input validation error raised by the shared value types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable, caller-visible classification of every failure.
///
/// Subsystem error enums map onto one of these through their `kind()`
/// accessor; the API gateway picks the HTTP status from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ValidationError,
    NotAuthorized,
    AccountBlocked,
    AccountDeleted,
    RateLimited,
    QuotaExceeded,
    OtpNotFound,
    OtpExpired,
    InvalidOtp,
    AttemptsExhausted,
    TokenInvalid,
    TokenExpired,
    UserNotFound,
    AlreadyMapped,
    NotMapped,
    InsufficientStock,
    AlreadyProcessed,
    NothingToClaim,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "ValidationError",
            Self::NotAuthorized => "NotAuthorized",
            Self::AccountBlocked => "AccountBlocked",
            Self::AccountDeleted => "AccountDeleted",
            Self::RateLimited => "RateLimited",
            Self::QuotaExceeded => "QuotaExceeded",
            Self::OtpNotFound => "OtpNotFound",
            Self::OtpExpired => "OtpExpired",
            Self::InvalidOtp => "InvalidOtp",
            Self::AttemptsExhausted => "AttemptsExhausted",
            Self::TokenInvalid => "TokenInvalid",
            Self::TokenExpired => "TokenExpired",
            Self::UserNotFound => "UserNotFound",
            Self::AlreadyMapped => "AlreadyMapped",
            Self::NotMapped => "NotMapped",
            Self::InsufficientStock => "InsufficientStock",
            Self::AlreadyProcessed => "AlreadyProcessed",
            Self::NothingToClaim => "NothingToClaim",
            Self::NotFound => "NotFound",
            Self::Conflict => "Conflict",
            Self::Internal => "Internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Malformed input rejected before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid phone number format: {0}")]
    InvalidPhone(String),

    #[error("Invalid country code: {0}")]
    InvalidCountryCode(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::ValidationError
    }
}
