//! Ports layer for the Reward subsystem

pub mod inbound;
pub mod outbound;

pub use inbound::RewardApi;
pub use outbound::{BeneficiaryDirectory, RewardAccounts, RewardStore};
