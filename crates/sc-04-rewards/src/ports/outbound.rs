//! # Outbound Ports
//!
//! | Trait | Implemented by | Purpose |
//! |-------|----------------|---------|
//! | `BeneficiaryDirectory` | node-runtime (identity subsystem) | name, role, status |
//! | `RewardAccounts` | node-runtime (stock ledger) | sale volume, balance, credit |
//! | `RewardStore` | `adapters::memory` | claimed volume per (user, period) |

use crate::domain::{Beneficiary, Reward, RewardResult};
use shared_types::{Period, Quantity, RewardId, Role, UserId};

pub trait BeneficiaryDirectory: Send + Sync {
    fn beneficiary(&self, id: UserId) -> Option<Beneficiary>;
}

/// The reward engine reads sale volume from, and credits rewards to, the
/// stock ledger. It never writes a balance itself.
pub trait RewardAccounts: Send + Sync {
    fn sale_total(&self, user: UserId, role: Role, period: Period) -> Quantity;

    fn reward_eligible_balance(&self, user: UserId) -> Quantity;

    /// Returns the new reward-eligible balance.
    fn credit_reward(&self, user: UserId, quantity: Quantity, reward: RewardId) -> RewardResult<Quantity>;
}

pub trait RewardStore: Send + Sync {
    /// Eligible volume already paid for in `period`.
    fn claimed_eligible(&self, user: UserId, period: Period) -> Quantity;

    /// Runs `decide` with the claimed volume for (user, period) while holding
    /// that key's lock. A returned reward is stored and its
    /// `newly_covered_kg` added to the claimed volume; nothing changes on error.
    fn claim_with(
        &self,
        user: UserId,
        period: Period,
        decide: &mut dyn FnMut(Quantity) -> RewardResult<Reward>,
    ) -> RewardResult<Reward>;

    fn history(&self, user: UserId) -> Vec<Reward>;
}
