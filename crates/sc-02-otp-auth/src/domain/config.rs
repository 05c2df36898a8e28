//! OTP, rate limit and token settings

use serde::{Deserialize, Serialize};
use shared_types::{DAY_MS, SECOND_MS};

/// Signing key used when none is configured. Production startup refuses it.
pub const DEFAULT_TOKEN_SECRET: &str = "steel-chain-dev-secret-change-me";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpConfig {
    /// Code lifetime (seconds)
    pub code_ttl_secs: u64,
    /// Failed verifications allowed per code
    pub max_attempts: u32,
    /// Minimum gap between two send requests (seconds)
    pub cooldown_secs: u64,
    /// Send requests allowed per rate-limit window
    pub daily_quota: u32,
    /// Rate-limit record lifetime, refreshed on every send (seconds)
    pub rate_window_secs: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: 300,
            max_attempts: 5,
            cooldown_secs: 60,
            daily_quota: 10,
            rate_window_secs: DAY_MS / SECOND_MS,
        }
    }
}

impl OtpConfig {
    pub fn code_ttl_ms(&self) -> u64 {
        self.code_ttl_secs.saturating_mul(SECOND_MS)
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_secs.saturating_mul(SECOND_MS)
    }

    pub fn rate_window_ms(&self) -> u64 {
        self.rate_window_secs.saturating_mul(SECOND_MS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// HMAC-SHA256 key
    pub secret: String,
    /// Session lifetime (seconds)
    pub ttl_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_TOKEN_SECRET.to_string(),
            ttl_secs: 7 * DAY_MS / SECOND_MS,
        }
    }
}

impl TokenConfig {
    pub fn ttl_ms(&self) -> u64 {
        self.ttl_secs.saturating_mul(SECOND_MS)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_TOKEN_SECRET
    }
}
