//! Capability-based authorization.
//!
//! Every route-level check is a call to [`authorize`] with one of the
//! enumerated [`Action`]s. Relationship checks that need the target record
//! (ownership of a barbender, who dispatched a stock transfer) carry the
//! relevant ids inside the action.
//!
//! | Action | Allowed |
//! |--------|---------|
//! | `ProvisionUser` | SA for ASO/Dealer, Dealer for Barbender |
//! | `ChangeUserStatus` | SA for ASO/Dealer/Barbender, owning Dealer for Barbender |
//! | `ViewQr` | the user, its owning Dealer, SA |
//! | `ManageMappings`, `ViewMappings`, `ManageProducts` | SA |
//! | `ViewAssignedDealers`, `DispatchStock` | ASO |
//! | `CancelDispatch` | dispatching ASO, SA |
//! | `ReceiveStock`, `SellStock`, `ViewStockSummary`, `ListOwnBarbenders` | Dealer |
//! | `ViewDispatches` | Dealer, ASO |
//! | `ViewSales`, `ViewRewards`, `ClaimReward` | Dealer, Barbender |
//! | `RecordPurchase`, `ViewPurchases` | Barbender |
//! | `ViewProfile`, `ViewProducts` | any active user |

use crate::domain::{IdentityError, IdentityResult};
use shared_types::{Principal, Role, UserId, UserStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewProfile,
    ProvisionUser { role: Role },
    ChangeUserStatus {
        target: UserId,
        target_role: Role,
        target_owner: Option<UserId>,
    },
    ListOwnBarbenders,
    ViewQr {
        target: UserId,
        target_owner: Option<UserId>,
    },
    ManageMappings,
    ViewMappings,
    ViewAssignedDealers,
    DispatchStock,
    CancelDispatch { dispatched_by: UserId },
    ReceiveStock,
    ViewDispatches,
    ViewStockSummary,
    SellStock,
    ViewSales,
    RecordPurchase,
    ViewPurchases,
    ViewProducts,
    ManageProducts,
    ViewRewards,
    ClaimReward,
}

impl Action {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ViewProfile => "view profile",
            Self::ProvisionUser { .. } => "create this user",
            Self::ChangeUserStatus { .. } => "change this user's status",
            Self::ListOwnBarbenders => "list barbenders",
            Self::ViewQr { .. } => "view this QR code",
            Self::ManageMappings => "manage mappings",
            Self::ViewMappings => "view mappings",
            Self::ViewAssignedDealers => "view assigned dealers",
            Self::DispatchStock => "dispatch stock",
            Self::CancelDispatch { .. } => "cancel this dispatch",
            Self::ReceiveStock => "receive stock",
            Self::ViewDispatches => "view dispatches",
            Self::ViewStockSummary => "view stock summary",
            Self::SellStock => "sell stock",
            Self::ViewSales => "view sales",
            Self::RecordPurchase => "record purchases",
            Self::ViewPurchases => "view purchases",
            Self::ViewProducts => "view products",
            Self::ManageProducts => "manage products",
            Self::ViewRewards => "view rewards",
            Self::ClaimReward => "claim rewards",
        }
    }
}

fn allows(p: &Principal, action: &Action) -> bool {
    use Role::*;
    match *action {
        Action::ViewProfile | Action::ViewProducts => true,
        Action::ProvisionUser { role } => matches!(
            (p.role, role),
            (SuperAdmin, Aso) | (SuperAdmin, Dealer) | (Dealer, Barbender)
        ),
        Action::ChangeUserStatus {
            target,
            target_role,
            target_owner,
        } => {
            target != p.id
                && match (p.role, target_role) {
                    (SuperAdmin, Aso | Dealer | Barbender) => true,
                    (Dealer, Barbender) => target_owner == Some(p.id),
                    _ => false,
                }
        }
        Action::ViewQr {
            target,
            target_owner,
        } => target == p.id || p.role == SuperAdmin || target_owner == Some(p.id),
        Action::ManageMappings | Action::ViewMappings | Action::ManageProducts => {
            p.role == SuperAdmin
        }
        Action::ViewAssignedDealers | Action::DispatchStock => p.role == Aso,
        Action::CancelDispatch { dispatched_by } => {
            p.role == SuperAdmin || (p.role == Aso && dispatched_by == p.id)
        }
        Action::ReceiveStock
        | Action::SellStock
        | Action::ViewStockSummary
        | Action::ListOwnBarbenders => p.role == Dealer,
        Action::ViewDispatches => matches!(p.role, Dealer | Aso),
        Action::ViewSales | Action::ViewRewards | Action::ClaimReward => {
            matches!(p.role, Dealer | Barbender)
        }
        Action::RecordPurchase | Action::ViewPurchases => p.role == Barbender,
    }
}

/// Allows or denies `action` for `principal`. Only ACTIVE principals pass.
pub fn authorize(principal: &Principal, action: Action) -> IdentityResult<()> {
    match principal.status {
        UserStatus::Active => {}
        UserStatus::Blocked => return Err(IdentityError::AccountBlocked),
        UserStatus::Deleted => return Err(IdentityError::AccountDeleted),
        UserStatus::Pending => {
            return Err(IdentityError::NotAuthorized {
                action: action.name(),
            })
        }
    }
    if allows(principal, &action) {
        Ok(())
    } else {
        Err(IdentityError::NotAuthorized {
            action: action.name(),
        })
    }
}
