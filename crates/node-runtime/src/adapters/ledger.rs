//! Stock ledger adapter for the reward engine.
//!
//! Reward tiers are computed from the ledger's sale aggregates, and a claim
//! lands as a credit on the claimant's reward-eligible account.

use std::sync::Arc;

use sc_03_stock_ledger::StockLedgerApi;
use sc_04_rewards::{RewardAccounts, RewardError, RewardResult};
use shared_types::{Period, Quantity, RewardId, Role, UserId};

/// Implements the reward engine's `RewardAccounts` over the stock ledger.
pub struct RewardAccountsAdapter {
    ledger: Arc<dyn StockLedgerApi>,
}

impl RewardAccountsAdapter {
    pub fn new(ledger: Arc<dyn StockLedgerApi>) -> Self {
        Self { ledger }
    }
}

impl RewardAccounts for RewardAccountsAdapter {
    fn sale_total(&self, user: UserId, role: Role, period: Period) -> Quantity {
        self.ledger.sale_total(user, role, period)
    }

    fn reward_eligible_balance(&self, user: UserId) -> Quantity {
        self.ledger.balances(user).reward_eligible_qty
    }

    fn credit_reward(
        &self,
        user: UserId,
        quantity: Quantity,
        reward: RewardId,
    ) -> RewardResult<Quantity> {
        self.ledger
            .credit_reward(user, quantity, reward)
            .map(|balances| balances.reward_eligible_qty)
            .map_err(|err| RewardError::Credit {
                kind: err.kind(),
                message: err.to_string(),
            })
    }
}
