//! In-memory reward store.
//!
//! One `DashMap` entry per (user, period). A claim holds that entry's lock
//! for the whole recompute-credit-record step, so two claims for the same
//! period run one after the other and the second sees the first's volume.

use crate::domain::{Reward, RewardResult};
use crate::ports::RewardStore;
use dashmap::DashMap;
use shared_types::{Period, Quantity, UserId};

#[derive(Debug, Default)]
struct PeriodClaims {
    claimed_eligible: Quantity,
    rewards: Vec<Reward>,
}

#[derive(Debug, Default)]
pub struct MemoryRewardStore {
    claims: DashMap<(UserId, Period), PeriodClaims>,
}

impl MemoryRewardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RewardStore for MemoryRewardStore {
    fn claimed_eligible(&self, user: UserId, period: Period) -> Quantity {
        self.claims
            .get(&(user, period))
            .map_or(Quantity::ZERO, |c| c.claimed_eligible)
    }

    fn claim_with(
        &self,
        user: UserId,
        period: Period,
        decide: &mut dyn FnMut(Quantity) -> RewardResult<Reward>,
    ) -> RewardResult<Reward> {
        let mut entry = self.claims.entry((user, period)).or_default();
        let reward = decide(entry.claimed_eligible)?;
        entry.claimed_eligible = entry.claimed_eligible.saturating_add(reward.newly_covered_kg);
        entry.rewards.push(reward.clone());
        Ok(reward)
    }

    fn history(&self, user: UserId) -> Vec<Reward> {
        let mut out: Vec<Reward> = self
            .claims
            .iter()
            .filter(|e| e.key().0 == user)
            .flat_map(|e| e.value().rewards.clone())
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}
