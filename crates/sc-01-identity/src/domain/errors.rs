//! Error types for the Identity subsystem

use shared_types::{ErrorKind, PhoneNumber, Role, UserId, UserStatus, ValidationError};
use thiserror::Error;

/// Identity subsystem errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Caller's role or relationship does not permit the action
    #[error("Not authorized to {action}")]
    NotAuthorized { action: &'static str },

    /// Phone number is not registered (closed registration)
    #[error("Phone number {0} is not registered")]
    PhoneNotRegistered(PhoneNumber),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Account is blocked")]
    AccountBlocked,

    #[error("Account is deleted")]
    AccountDeleted,

    /// A user with this phone number already exists
    #[error("Phone number {0} is already registered")]
    PhoneTaken(PhoneNumber),

    #[error("User {user} has role {actual}, expected {expected}")]
    WrongRole {
        user: UserId,
        expected: Role,
        actual: Role,
    },

    #[error("Dealer {dealer} is already mapped to ASO {aso}")]
    AlreadyMapped { dealer: UserId, aso: UserId },

    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition { from: UserStatus, to: UserStatus },
}

impl IdentityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::WrongRole { .. } | Self::InvalidTransition { .. } => {
                ErrorKind::ValidationError
            }
            Self::NotAuthorized { .. } | Self::PhoneNotRegistered(_) => ErrorKind::NotAuthorized,
            Self::UserNotFound(_) => ErrorKind::UserNotFound,
            Self::AccountBlocked => ErrorKind::AccountBlocked,
            Self::AccountDeleted => ErrorKind::AccountDeleted,
            Self::PhoneTaken(_) => ErrorKind::Conflict,
            Self::AlreadyMapped { .. } => ErrorKind::AlreadyMapped,
        }
    }
}

pub type IdentityResult<T> = Result<T, IdentityError>;
