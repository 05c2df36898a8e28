//! Error types for the Reward subsystem

use shared_types::{ErrorKind, Role, UserId, UserStatus, ValidationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Role {0} does not earn rewards")]
    NotEligible(Role),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Account is {0}")]
    AccountInactive(UserStatus),

    #[error("No rewards available")]
    NothingToClaim,

    /// The ledger refused the reward credit
    #[error("Reward credit failed: {message}")]
    Credit { kind: ErrorKind, message: String },
}

impl RewardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::NotEligible(_) => ErrorKind::NotAuthorized,
            Self::UserNotFound(_) => ErrorKind::UserNotFound,
            Self::AccountInactive(status) => match status {
                UserStatus::Blocked => ErrorKind::AccountBlocked,
                UserStatus::Deleted => ErrorKind::AccountDeleted,
                UserStatus::Pending | UserStatus::Active => ErrorKind::NotAuthorized,
            },
            Self::NothingToClaim => ErrorKind::NothingToClaim,
            Self::Credit { kind, .. } => *kind,
        }
    }
}

pub type RewardResult<T> = Result<T, RewardError>;
