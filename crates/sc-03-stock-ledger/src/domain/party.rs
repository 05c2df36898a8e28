//! The ledger's view of a user: just enough to check who may move stock.

use super::errors::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use shared_types::{Role, UserId, UserStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    /// Dealer only: the ASO the dealer is currently mapped to.
    pub assigned_aso: Option<UserId>,
    /// Barbender only: the dealer that provisioned it.
    pub owner_dealer: Option<UserId>,
}

impl Party {
    pub fn ensure_role(&self, expected: Role) -> LedgerResult<()> {
        if self.role == expected {
            Ok(())
        } else {
            Err(LedgerError::WrongRole {
                user: self.id,
                expected,
                actual: self.role,
            })
        }
    }

    /// Only ACTIVE users originate transactions.
    pub fn ensure_active(&self) -> LedgerResult<()> {
        if self.status.can_transact() {
            Ok(())
        } else {
            Err(LedgerError::PartyInactive {
                user: self.id,
                status: self.status,
            })
        }
    }

    /// Counterparties may still be PENDING, never BLOCKED or DELETED.
    pub fn ensure_not_suspended(&self) -> LedgerResult<()> {
        match self.status {
            UserStatus::Blocked | UserStatus::Deleted => Err(LedgerError::PartyInactive {
                user: self.id,
                status: self.status,
            }),
            UserStatus::Pending | UserStatus::Active => Ok(()),
        }
    }
}
