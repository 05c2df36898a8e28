//! Domain layer for the Reward subsystem

pub mod calc;
pub mod config;
pub mod errors;
pub mod reward;

pub use calc::{eligible, reward_for, LoyaltyTier, RewardCalc};
pub use config::RewardConfig;
pub use errors::{RewardError, RewardResult};
pub use reward::{Beneficiary, ClaimOutcome, Reward, RewardStatus, RewardSummary};
