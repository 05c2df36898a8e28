//! Stock dispatches from an ASO to a mapped dealer.

use super::errors::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use shared_types::{DispatchId, ProductId, Quantity, Timestamp, UserId};
use std::fmt;

/// Dispatch lifecycle.
///
/// ```text
/// [PENDING] ──receive──→ [RECEIVED]
///     │
///     └──cancel──→ [CANCELLED]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DispatchStatus {
    Pending,
    Received,
    Cancelled,
}

impl fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Received => "RECEIVED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDispatch {
    pub id: DispatchId,
    pub aso_id: UserId,
    pub dealer_id: UserId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub dispatched_at: Timestamp,
    pub day_number: i64,
    pub status: DispatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StockDispatch {
    pub fn ensure_pending(&self) -> LedgerResult<()> {
        if self.status == DispatchStatus::Pending {
            Ok(())
        } else {
            Err(LedgerError::AlreadyProcessed {
                id: self.id,
                status: self.status,
            })
        }
    }

    pub fn mark_received(&mut self, now: Timestamp) -> LedgerResult<()> {
        self.ensure_pending()?;
        self.status = DispatchStatus::Received;
        self.received_at = Some(now);
        Ok(())
    }

    pub fn mark_cancelled(&mut self, now: Timestamp) -> LedgerResult<()> {
        self.ensure_pending()?;
        self.status = DispatchStatus::Cancelled;
        self.cancelled_at = Some(now);
        Ok(())
    }
}
