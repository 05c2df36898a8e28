//! # Outbound Ports
//!
//! The ledger never reads the identity store directly. The node runtime
//! adapts the identity subsystem to [`PartyDirectory`].

use crate::domain::Party;
use shared_types::UserId;

pub trait PartyDirectory: Send + Sync {
    /// Live role, status and hierarchy edges of a user.
    fn party(&self, id: UserId) -> Option<Party>;
}
