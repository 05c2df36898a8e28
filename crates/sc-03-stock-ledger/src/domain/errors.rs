//! Error types for the Stock Ledger subsystem

use super::dispatch::DispatchStatus;
use shared_types::{
    DispatchId, ErrorKind, ProductId, Quantity, Role, UserId, UserStatus, ValidationError,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not authorized: {reason}")]
    NotAuthorized { reason: &'static str },

    #[error("User not found: {0}")]
    PartyNotFound(UserId),

    #[error("User {user} has role {actual}, expected {expected}")]
    WrongRole {
        user: UserId,
        expected: Role,
        actual: Role,
    },

    #[error("User {user} is {status} and cannot transact")]
    PartyInactive { user: UserId, status: UserStatus },

    #[error("Dealer {dealer} is not mapped to ASO {aso}")]
    NotMapped { dealer: UserId, aso: UserId },

    #[error("Barbender {barbender} does not belong to dealer {dealer}")]
    NotOwned { barbender: UserId, dealer: UserId },

    #[error("Dispatch not found: {0}")]
    DispatchNotFound(DispatchId),

    #[error("Dispatch {id} already {status}")]
    AlreadyProcessed { id: DispatchId, status: DispatchStatus },

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Product {0} is inactive")]
    ProductInactive(ProductId),

    #[error("Product code {0} already exists")]
    DuplicateProductCode(String),

    #[error("Insufficient stock: available {available}, requested {requested}")]
    InsufficientStock {
        available: Quantity,
        requested: Quantity,
    },

    /// A posting would overflow an account balance
    #[error("Balance overflow on account of {0}")]
    Overflow(UserId),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::WrongRole { .. } | Self::ProductInactive(_) => {
                ErrorKind::ValidationError
            }
            Self::NotAuthorized { .. } | Self::NotOwned { .. } => ErrorKind::NotAuthorized,
            Self::PartyNotFound(_) => ErrorKind::UserNotFound,
            Self::PartyInactive { status, .. } => match status {
                UserStatus::Blocked => ErrorKind::AccountBlocked,
                UserStatus::Deleted => ErrorKind::AccountDeleted,
                UserStatus::Pending | UserStatus::Active => ErrorKind::NotAuthorized,
            },
            Self::NotMapped { .. } => ErrorKind::NotMapped,
            Self::DispatchNotFound(_) | Self::ProductNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyProcessed { .. } => ErrorKind::AlreadyProcessed,
            Self::DuplicateProductCode(_) => ErrorKind::Conflict,
            Self::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            Self::Overflow(_) => ErrorKind::Internal,
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
