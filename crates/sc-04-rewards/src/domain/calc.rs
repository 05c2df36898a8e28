//! # Reward Arithmetic
//!
//! Volume counts in whole threshold blocks: 250 kg with a 100 kg threshold
//! is 200 kg eligible. The reward is the rate applied to the eligible
//! volume, floored to whole kilograms.
//!
//! Claims are incremental. A period may be claimed several times; each
//! claim only pays for eligible volume no earlier claim has covered.

use super::config::RewardConfig;
use serde::{Deserialize, Serialize};
use shared_types::{Quantity, GRAMS_PER_KG};

const BPS_DENOMINATOR: u128 = 10_000;

/// Eligible part of `total`: whole threshold blocks only.
pub fn eligible(total: Quantity, cfg: &RewardConfig) -> Quantity {
    let block = cfg.threshold_kg.saturating_mul(GRAMS_PER_KG);
    if block == 0 {
        return total;
    }
    Quantity::from_grams(total.grams() / block * block)
}

/// Reward for `eligible` volume, floored to whole kg.
pub fn reward_for(eligible: Quantity, cfg: &RewardConfig) -> Quantity {
    let grams = u128::from(eligible.grams()) * u128::from(cfg.rate_bps) / BPS_DENOMINATOR;
    let whole_kg = grams / u128::from(GRAMS_PER_KG);
    Quantity::from_kg(u64::try_from(whole_kg).unwrap_or(u64::MAX / GRAMS_PER_KG))
}

/// The numbers behind a summary or a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardCalc {
    pub total_kg: Quantity,
    pub eligible_kg: Quantity,
    pub reward_kg: Quantity,
    pub already_claimed_eligible_kg: Quantity,
    pub claimable_eligible_kg: Quantity,
    pub claimable_reward_kg: Quantity,
}

impl RewardCalc {
    pub fn compute(total: Quantity, already_claimed: Quantity, cfg: &RewardConfig) -> Self {
        let eligible_kg = eligible(total, cfg);
        let claimable_eligible_kg = eligible_kg.saturating_sub(already_claimed);
        Self {
            total_kg: total,
            eligible_kg,
            reward_kg: reward_for(eligible_kg, cfg),
            already_claimed_eligible_kg: already_claimed,
            claimable_eligible_kg,
            claimable_reward_kg: reward_for(claimable_eligible_kg, cfg),
        }
    }
}

/// Loyalty tier by reward-eligible balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
}

impl LoyaltyTier {
    pub fn for_balance(reward_eligible: Quantity) -> Self {
        if reward_eligible >= Quantity::from_kg(1_000) {
            Self::Gold
        } else if reward_eligible >= Quantity::from_kg(500) {
            Self::Silver
        } else {
            Self::Bronze
        }
    }
}
