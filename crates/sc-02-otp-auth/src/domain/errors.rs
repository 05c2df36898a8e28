//! Error types for the OTP and token subsystem

use shared_types::{ErrorKind, ValidationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Closed registration: the phone was never provisioned
    #[error("Phone number not authorized. Please contact administrator.")]
    NotRegistered,

    #[error("Account is blocked. Please contact administrator.")]
    AccountBlocked,

    #[error("Account is deleted")]
    AccountDeleted,

    #[error("Please wait {wait_secs} seconds before requesting another OTP")]
    RateLimited { wait_secs: u64 },

    #[error("Daily OTP limit reached ({limit} requests). Try again tomorrow.")]
    QuotaExceeded { limit: u32 },

    #[error("OTP not found or expired. Please request a new OTP.")]
    OtpNotFound,

    #[error("OTP expired. Please request a new OTP.")]
    OtpExpired,

    #[error("Invalid OTP")]
    InvalidOtp { remaining_attempts: u32 },

    #[error("Too many failed attempts. Please request a new OTP.")]
    AttemptsExhausted,

    #[error("Invalid token: {0}")]
    TokenInvalid(&'static str),

    #[error("Token expired")]
    TokenExpired,

    #[error("User not found")]
    UserNotFound,

    /// Directory or signing failure not listed above
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::NotRegistered => ErrorKind::NotAuthorized,
            Self::AccountBlocked => ErrorKind::AccountBlocked,
            Self::AccountDeleted => ErrorKind::AccountDeleted,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            Self::OtpNotFound => ErrorKind::OtpNotFound,
            Self::OtpExpired => ErrorKind::OtpExpired,
            Self::InvalidOtp { .. } => ErrorKind::InvalidOtp,
            Self::AttemptsExhausted => ErrorKind::AttemptsExhausted,
            Self::TokenInvalid(_) => ErrorKind::TokenInvalid,
            Self::TokenExpired => ErrorKind::TokenExpired,
            Self::UserNotFound => ErrorKind::UserNotFound,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
