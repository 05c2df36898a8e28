//! # Daily Stock
//!
//! One row per (dealer, UTC date). A row opens at the closing balance of the
//! dealer's most recent earlier row and accumulates the day's receipts and
//! outgoing sales, so `closing = opening + received - dispatched` always
//! reproduces the dealer's available ledger balance.
//!
//! Updates are two-step: [`DailyBook::project`] computes the next row
//! without storing it, [`DailyBook::store`] commits it once the matching
//! ledger posting has succeeded.

use super::errors::{LedgerError, LedgerResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared_types::{date_of, sequential_day, Quantity, Timestamp, UserId};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStock {
    pub dealer_id: UserId,
    pub date: NaiveDate,
    pub sequential_day: i64,
    pub opening_balance: Quantity,
    pub total_received: Quantity,
    pub total_dispatched: Quantity,
    pub closing_balance: Quantity,
    pub updated_at: Timestamp,
}

/// Movement to fold into a day's row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyMovement {
    Received(Quantity),
    Dispatched(Quantity),
}

#[derive(Debug, Default)]
pub struct DailyBook {
    rows: BTreeMap<(UserId, NaiveDate), DailyStock>,
}

impl DailyBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dealer: UserId, date: NaiveDate) -> Option<&DailyStock> {
        self.rows.get(&(dealer, date))
    }

    /// Most recent row strictly before `date`.
    fn previous(&self, dealer: UserId, date: NaiveDate) -> Option<&DailyStock> {
        self.rows
            .range((dealer, NaiveDate::MIN)..(dealer, date))
            .next_back()
            .map(|(_, row)| row)
    }

    /// Closing balance the dealer carries into `date`.
    pub fn opening_for(&self, dealer: UserId, date: NaiveDate) -> Quantity {
        self.previous(dealer, date)
            .map_or(Quantity::ZERO, |row| row.closing_balance)
    }

    pub fn project(&self, dealer: UserId, at: Timestamp, movement: DailyMovement) -> LedgerResult<DailyStock> {
        let date = date_of(at);
        let mut row = self.get(dealer, date).cloned().unwrap_or_else(|| {
            let opening = self.opening_for(dealer, date);
            DailyStock {
                dealer_id: dealer,
                date,
                sequential_day: sequential_day(at),
                opening_balance: opening,
                total_received: Quantity::ZERO,
                total_dispatched: Quantity::ZERO,
                closing_balance: opening,
                updated_at: at,
            }
        });

        let overflow = || LedgerError::Overflow(dealer);
        match movement {
            DailyMovement::Received(qty) => {
                row.total_received = row.total_received.checked_add(qty).ok_or_else(overflow)?;
                row.closing_balance = row.closing_balance.checked_add(qty).ok_or_else(overflow)?;
            }
            DailyMovement::Dispatched(qty) => {
                row.total_dispatched = row.total_dispatched.checked_add(qty).ok_or_else(overflow)?;
                row.closing_balance = row.closing_balance.checked_sub(qty).ok_or(
                    LedgerError::InsufficientStock {
                        available: row.closing_balance,
                        requested: qty,
                    },
                )?;
            }
        }
        row.updated_at = at;
        Ok(row)
    }

    pub fn store(&mut self, row: DailyStock) {
        self.rows.insert((row.dealer_id, row.date), row);
    }

    /// Today's row, or the zero-movement row a dealer would open with.
    pub fn today(&self, dealer: UserId, now: Timestamp) -> DailyStock {
        let date = date_of(now);
        self.get(dealer, date).cloned().unwrap_or_else(|| {
            let opening = self.opening_for(dealer, date);
            DailyStock {
                dealer_id: dealer,
                date,
                sequential_day: sequential_day(now),
                opening_balance: opening,
                total_received: Quantity::ZERO,
                total_dispatched: Quantity::ZERO,
                closing_balance: opening,
                updated_at: now,
            }
        })
    }

    /// Stored rows for a dealer, newest first.
    pub fn history(&self, dealer: UserId) -> Vec<DailyStock> {
        self.rows
            .range((dealer, NaiveDate::MIN)..=(dealer, NaiveDate::MAX))
            .rev()
            .map(|(_, row)| row.clone())
            .collect()
    }

    /// Closing balance of the dealer's latest row.
    pub fn latest_closing(&self, dealer: UserId) -> Quantity {
        self.history(dealer)
            .first()
            .map_or(Quantity::ZERO, |row| row.closing_balance)
    }
}
