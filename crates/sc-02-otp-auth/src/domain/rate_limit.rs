//! Per-phone send throttling, independent of code validity
//!
//! A record lives for one rate window (24h by default) and every admitted
//! request pushes its expiry out again. When it finally expires the
//! counter starts over with a fresh record.

use super::config::OtpConfig;
use super::errors::AuthError;
use serde::{Deserialize, Serialize};
use shared_types::{PhoneKey, Timestamp, SECOND_MS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRecord {
    pub key: PhoneKey,
    pub last_request_at: Timestamp,
    pub daily_request_count: u32,
    pub expires_at: Timestamp,
}

impl RateLimitRecord {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }
}

/// Decides whether a send request is admitted and returns the updated record.
///
/// An expired record is treated as absent.
pub fn admit(
    key: &PhoneKey,
    existing: Option<&RateLimitRecord>,
    now: Timestamp,
    config: &OtpConfig,
) -> Result<RateLimitRecord, AuthError> {
    let live = existing.filter(|r| !r.is_expired(now));
    let count = match live {
        Some(record) => {
            let elapsed = now.saturating_sub(record.last_request_at);
            let cooldown = config.cooldown_ms();
            if elapsed < cooldown {
                let wait_secs = (cooldown - elapsed).div_ceil(SECOND_MS);
                return Err(AuthError::RateLimited { wait_secs });
            }
            if record.daily_request_count >= config.daily_quota {
                return Err(AuthError::QuotaExceeded {
                    limit: config.daily_quota,
                });
            }
            record.daily_request_count
        }
        None => 0,
    };
    Ok(RateLimitRecord {
        key: key.clone(),
        last_request_at: now,
        daily_request_count: count + 1,
        expires_at: now.saturating_add(config.rate_window_ms()),
    })
}
