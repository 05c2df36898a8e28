//! Reward programme settings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Sales volume is counted in whole blocks of this many kg
    pub threshold_kg: u64,
    /// Reward rate in basis points of the eligible volume
    pub rate_bps: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            threshold_kg: 100,
            rate_bps: 500,
        }
    }
}
