//! Reward records and the shapes returned to callers.

use super::calc::{LoyaltyTier, RewardCalc};
use serde::{Deserialize, Serialize};
use shared_types::{Period, Quantity, RewardId, Role, Timestamp, UserId, UserStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardStatus {
    Pending,
    Claimed,
}

/// Who a reward is computed for, as seen by the reward engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: RewardId,
    pub user_id: UserId,
    pub user_role: Role,
    pub user_name: String,
    pub period: Period,
    pub total_kg: Quantity,
    pub eligible_kg: Quantity,
    /// Eligible volume this claim paid for.
    pub newly_covered_kg: Quantity,
    pub reward_kg: Quantity,
    pub status: RewardStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardSummary {
    pub period: Period,
    #[serde(flatten)]
    pub calc: RewardCalc,
    /// Current reward-eligible balance.
    pub current_balance: Quantity,
    pub tier: LoyaltyTier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimOutcome {
    pub message: String,
    pub reward: Reward,
    pub reward_kg: Quantity,
    pub new_balance: Quantity,
}
