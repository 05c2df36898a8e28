//! In-memory OTP and rate-limit stores.
//!
//! Both are `DashMap`s keyed by phone key, so operations on one phone hold
//! that key's shard lock and never block other phones. Expired records stay
//! readable until `purge_expired` runs; the node runtime drives it from a
//! periodic task.

use crate::domain::{AuthResult, Disposition, OtpRecord, RateLimitRecord};
use crate::ports::{OtpStore, RateLimitStore};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shared_types::{PhoneKey, Timestamp};

#[derive(Debug, Default)]
pub struct MemoryOtpStore {
    records: DashMap<PhoneKey, OtpRecord>,
}

impl MemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OtpStore for MemoryOtpStore {
    fn upsert(&self, record: OtpRecord) {
        self.records.insert(record.key.clone(), record);
    }

    fn attempt(
        &self,
        key: &PhoneKey,
        step: &mut dyn FnMut(&mut OtpRecord) -> Disposition,
    ) -> bool {
        match self.records.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                if step(entry.get_mut()) == Disposition::Remove {
                    entry.remove();
                }
                true
            }
            Entry::Vacant(_) => false,
        }
    }

    fn get(&self, key: &PhoneKey) -> Option<OtpRecord> {
        self.records.get(key).map(|r| r.value().clone())
    }

    fn purge_expired(&self, now: Timestamp) -> usize {
        let before = self.records.len();
        self.records.retain(|_, r| !r.is_expired(now));
        before.saturating_sub(self.records.len())
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[derive(Debug, Default)]
pub struct MemoryRateLimitStore {
    records: DashMap<PhoneKey, RateLimitRecord>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    fn admit_with(
        &self,
        key: &PhoneKey,
        decide: &mut dyn FnMut(Option<&RateLimitRecord>) -> AuthResult<RateLimitRecord>,
    ) -> AuthResult<RateLimitRecord> {
        match self.records.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                let next = decide(Some(entry.get()))?;
                entry.insert(next.clone());
                Ok(next)
            }
            Entry::Vacant(entry) => {
                let next = decide(None)?;
                entry.insert(next.clone());
                Ok(next)
            }
        }
    }

    fn get(&self, key: &PhoneKey) -> Option<RateLimitRecord> {
        self.records.get(key).map(|r| r.value().clone())
    }

    fn purge_expired(&self, now: Timestamp) -> usize {
        let before = self.records.len();
        self.records.retain(|_, r| !r.is_expired(now));
        before.saturating_sub(self.records.len())
    }
}
