//! One-time codes and the verification state machine
//!
//! ```text
//! send ──→ [LIVE attempts=0] ──mismatch──→ [LIVE attempts+1]
//!               │                               │
//!               ├── match ──→ removed (session) │
//!               ├── now > expiry ──→ removed ←──┤
//!               └── attempts ≥ max ──→ removed ←┘
//! ```

use super::errors::AuthError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared_types::{PhoneKey, Timestamp};
use subtle::ConstantTimeEq;

pub const CODE_MIN: u32 = 100_000;
pub const CODE_MAX: u32 = 999_999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    pub key: PhoneKey,
    pub code: String,
    pub attempts: u32,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl OtpRecord {
    pub fn new(key: PhoneKey, code: String, now: Timestamp, ttl_ms: u64) -> Self {
        Self {
            key,
            code,
            attempts: 0,
            created_at: now,
            expires_at: now.saturating_add(ttl_ms),
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }
}

/// Uniformly random six-digit code.
pub fn generate_code<R: Rng>(rng: &mut R) -> String {
    rng.gen_range(CODE_MIN..=CODE_MAX).to_string()
}

/// Whether the store keeps or drops the record after a verification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Keep,
    Remove,
}

/// Applies one verification attempt to a live record.
///
/// Checks run in a fixed order: expiry, exhaustion, then the code itself.
/// An exhausted record is rejected even when the submitted code is right.
pub fn apply_attempt(
    record: &mut OtpRecord,
    submitted: &str,
    now: Timestamp,
    max_attempts: u32,
) -> (Disposition, Result<(), AuthError>) {
    if record.is_expired(now) {
        return (Disposition::Remove, Err(AuthError::OtpExpired));
    }
    if record.attempts >= max_attempts {
        return (Disposition::Remove, Err(AuthError::AttemptsExhausted));
    }
    let matches: bool = record.code.as_bytes().ct_eq(submitted.as_bytes()).into();
    if !matches {
        record.attempts += 1;
        let remaining_attempts = max_attempts.saturating_sub(record.attempts);
        return (
            Disposition::Keep,
            Err(AuthError::InvalidOtp { remaining_attempts }),
        );
    }
    (Disposition::Remove, Ok(()))
}
