//! # Inbound Port - RewardApi

use crate::domain::{ClaimOutcome, Reward, RewardResult, RewardSummary};
use shared_types::{Period, UserId};

pub trait RewardApi: Send + Sync {
    /// Volume, eligibility and claimable reward for `period`
    /// (the current calendar month when `None`).
    fn summary(&self, user: UserId, period: Option<Period>) -> RewardResult<RewardSummary>;

    /// Pays out the eligible volume no earlier claim in `period` covered.
    fn claim(&self, user: UserId, period: Option<Period>) -> RewardResult<ClaimOutcome>;

    /// Newest first.
    fn history(&self, user: UserId) -> RewardResult<Vec<Reward>>;
}
