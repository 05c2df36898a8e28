//! # Outbound Ports
//!
//! | Trait | Implemented by | Purpose |
//! |-------|----------------|---------|
//! | `IdentityDirectory` | node-runtime (identity subsystem) | phone lookup, activation |
//! | `SmsSender` | `adapters::sms` | best-effort code delivery |
//! | `OtpStore` | `adapters::memory` | one live code per phone key |
//! | `RateLimitStore` | `adapters::memory` | atomic check-and-increment |

use crate::domain::{AuthResult, Disposition, LoginIdentity, OtpRecord, RateLimitRecord};
use async_trait::async_trait;
use shared_types::{PhoneKey, PhoneNumber, Timestamp, UserId};

/// Read access to the pre-provisioned identities plus the one write the
/// login flow is allowed to make.
pub trait IdentityDirectory: Send + Sync {
    fn lookup(&self, phone: &PhoneNumber) -> Option<LoginIdentity>;

    fn resolve(&self, id: UserId) -> Option<LoginIdentity>;

    /// PENDING→ACTIVE and stamp the login time. Returns whether the
    /// identity was PENDING before.
    fn activate(&self, id: UserId) -> AuthResult<(LoginIdentity, bool)>;
}

/// SMS gateway. Returns `true` when the message was handed off.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, key: &PhoneKey, code: &str) -> bool;
}

pub trait OtpStore: Send + Sync {
    /// Replaces any existing record for the key.
    fn upsert(&self, record: OtpRecord);

    /// Runs `step` on the live record while holding the key's lock and
    /// applies the returned disposition. Returns `false` when no record exists.
    fn attempt(&self, key: &PhoneKey, step: &mut dyn FnMut(&mut OtpRecord) -> Disposition) -> bool;

    fn get(&self, key: &PhoneKey) -> Option<OtpRecord>;

    /// Drops records whose expiry has passed. Returns how many were removed.
    fn purge_expired(&self, now: Timestamp) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait RateLimitStore: Send + Sync {
    /// Runs `decide` on the current record while holding the key's lock and
    /// stores the record it returns. Nothing is stored on error.
    fn admit_with(
        &self,
        key: &PhoneKey,
        decide: &mut dyn FnMut(Option<&RateLimitRecord>) -> AuthResult<RateLimitRecord>,
    ) -> AuthResult<RateLimitRecord>;

    fn get(&self, key: &PhoneKey) -> Option<RateLimitRecord>;

    fn purge_expired(&self, now: Timestamp) -> usize;
}
