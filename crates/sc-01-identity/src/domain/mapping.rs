//! ASO↔Dealer hierarchy edges

use serde::{Deserialize, Serialize};
use shared_types::{MappingId, Timestamp, UserId};
use std::collections::BTreeSet;

/// Audit record of a dealer being assigned to an ASO.
///
/// A dealer has at most one `active` record at a time. Unmapping
/// deactivates the record instead of deleting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerMapping {
    pub id: MappingId,
    pub aso: UserId,
    pub dealer: UserId,
    pub created_by: UserId,
    pub active: bool,
    pub created_at: Timestamp,
    pub deactivated_at: Option<Timestamp>,
}

/// An ASO and the dealers mapped to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsoDealers {
    pub aso: UserId,
    pub name: String,
    pub dealers: BTreeSet<UserId>,
}

/// Outcome of a repair pass over the denormalized mapping state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// Dealers whose forward reference was rewritten.
    pub forward_refs_fixed: usize,
    /// Dealers added to an ASO's membership set.
    pub memberships_added: usize,
    /// Stale entries removed from membership sets.
    pub memberships_removed: usize,
    /// Audit records created for forward references that had none.
    pub mappings_created: usize,
    /// Active audit records deactivated because they were dangling or duplicated.
    pub mappings_deactivated: usize,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }

    pub fn total_repairs(&self) -> usize {
        self.forward_refs_fixed
            + self.memberships_added
            + self.memberships_removed
            + self.mappings_created
            + self.mappings_deactivated
    }
}
