//! # Balance Ledger
//!
//! Every change to a user's `availableQty` or `rewardEligibleQty` is an
//! append-only [`LedgerEntry`]. The cached balance map is updated in the
//! same call that appends, and [`Ledger::verify`] replays the entries to
//! prove the cache never drifted.
//!
//! A multi-leg posting is all-or-nothing: every leg is checked against the
//! projected balances before the first entry is written.

use super::errors::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use shared_types::{DispatchId, PurchaseId, Quantity, RewardId, SaleId, Timestamp, UserId};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BalanceKind {
    Available,
    RewardEligible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountKey {
    pub user: UserId,
    pub kind: BalanceKind,
}

impl AccountKey {
    pub const fn available(user: UserId) -> Self {
        Self {
            user,
            kind: BalanceKind::Available,
        }
    }

    pub const fn reward_eligible(user: UserId) -> Self {
        Self {
            user,
            kind: BalanceKind::RewardEligible,
        }
    }
}

/// The business event that produced a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EntryCause {
    Receipt { dispatch: DispatchId },
    Sale { sale: SaleId },
    Purchase { purchase: PurchaseId },
    RewardClaim { reward: RewardId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub seq: u64,
    pub account: AccountKey,
    /// Signed change in grams.
    pub delta: i64,
    pub cause: EntryCause,
    pub at: Timestamp,
}

/// One leg of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub account: AccountKey,
    pub delta: i64,
}

impl Posting {
    pub fn credit(account: AccountKey, qty: Quantity) -> Self {
        Self {
            account,
            delta: qty.as_delta(),
        }
    }

    pub fn debit(account: AccountKey, qty: Quantity) -> Self {
        Self {
            account,
            delta: -qty.as_delta(),
        }
    }
}

/// Current balances of one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    pub available_qty: Quantity,
    pub reward_eligible_qty: Quantity,
}

/// Outcome of replaying the entry log against the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub entries: u64,
    pub accounts: usize,
    /// Accounts whose cached balance differs from the replayed one.
    pub mismatched: Vec<AccountKey>,
}

impl IntegrityReport {
    pub fn is_consistent(&self) -> bool {
        self.mismatched.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    balances: HashMap<AccountKey, Quantity>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, account: AccountKey) -> Quantity {
        self.balances.get(&account).copied().unwrap_or(Quantity::ZERO)
    }

    pub fn balances_of(&self, user: UserId) -> Balances {
        Balances {
            available_qty: self.balance(AccountKey::available(user)),
            reward_eligible_qty: self.balance(AccountKey::reward_eligible(user)),
        }
    }

    /// Applies every leg or none of them.
    ///
    /// Legs on the same account are netted in order, so a debit that only
    /// succeeds after an earlier credit in the same posting is accepted.
    pub fn post(&mut self, legs: &[Posting], cause: EntryCause, at: Timestamp) -> LedgerResult<()> {
        let mut projected: HashMap<AccountKey, Quantity> = HashMap::new();
        for leg in legs {
            let current = projected
                .get(&leg.account)
                .copied()
                .unwrap_or_else(|| self.balance(leg.account));
            let next = apply_delta(current, leg.delta).ok_or_else(|| {
                if leg.delta < 0 {
                    LedgerError::InsufficientStock {
                        available: current,
                        requested: Quantity::from_grams(leg.delta.unsigned_abs()),
                    }
                } else {
                    LedgerError::Overflow(leg.account.user)
                }
            })?;
            projected.insert(leg.account, next);
        }

        for leg in legs {
            let seq = self.entries.len() as u64 + 1;
            self.entries.push(LedgerEntry {
                seq,
                account: leg.account,
                delta: leg.delta,
                cause,
                at,
            });
        }
        self.balances.extend(projected);
        Ok(())
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Entries touching either balance of `user`, oldest first.
    pub fn history(&self, user: UserId) -> Vec<LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| e.account.user == user)
            .cloned()
            .collect()
    }

    /// Folds the entry log into balances from scratch.
    pub fn replay(&self) -> HashMap<AccountKey, i128> {
        let mut folded: HashMap<AccountKey, i128> = HashMap::new();
        for entry in &self.entries {
            *folded.entry(entry.account).or_default() += i128::from(entry.delta);
        }
        folded
    }

    pub fn verify(&self) -> IntegrityReport {
        let replayed = self.replay();
        let mut mismatched: Vec<AccountKey> = replayed
            .iter()
            .filter(|(account, total)| i128::from(self.balance(**account).grams()) != **total)
            .map(|(account, _)| *account)
            .collect();
        mismatched.extend(
            self.balances
                .iter()
                .filter(|(account, qty)| !qty.is_zero() && !replayed.contains_key(account))
                .map(|(account, _)| *account),
        );
        mismatched.sort();
        IntegrityReport {
            entries: self.entries.len() as u64,
            accounts: self.balances.len(),
            mismatched,
        }
    }
}

fn apply_delta(current: Quantity, delta: i64) -> Option<Quantity> {
    let magnitude = Quantity::from_grams(delta.unsigned_abs());
    if delta < 0 {
        current.checked_sub(magnitude)
    } else {
        current.checked_add(magnitude)
    }
}
