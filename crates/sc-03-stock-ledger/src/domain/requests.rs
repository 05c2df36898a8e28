//! Request and result shapes of the ledger operations.

use super::daily::DailyStock;
use super::dispatch::{DispatchStatus, StockDispatch};
use super::ledger::Balances;
use super::sale::{Purchase, Sale};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared_types::{ProductId, Quantity, UserId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    pub dealer_id: UserId,
    pub product_id: ProductId,
    #[serde(alias = "quantityKg")]
    pub quantity: Quantity,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    #[serde(alias = "barbenderUserId")]
    pub barbender_id: UserId,
    pub product_id: ProductId,
    #[serde(alias = "quantityKg")]
    pub quantity: Quantity,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    #[serde(alias = "vendorName")]
    pub source_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(alias = "quantityKg")]
    pub quantity: Quantity,
    #[serde(default)]
    pub notes: Option<String>,
}

pub(crate) fn require_positive(qty: Quantity) -> Result<Quantity, ValidationError> {
    if qty.is_zero() {
        Err(ValidationError::NotPositive { field: "quantityKg" })
    } else {
        Ok(qty)
    }
}

/// Trims free text; blank becomes `None`.
pub(crate) fn clean_text(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveOutcome {
    pub dispatch: StockDispatch,
    pub new_balance: Quantity,
    pub daily_stock: DailyStock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleOutcome {
    pub sale: Sale,
    pub dealer_balance: Balances,
    pub barbender_balance: Balances,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOutcome {
    pub purchase: Purchase,
    pub balances: Balances,
}

/// Dispatch list plus the total already received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchHistory {
    pub dispatches: Vec<StockDispatch>,
    pub total_received: Quantity,
}

/// Received quantity per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedDay {
    pub date: NaiveDate,
    pub day_number: i64,
    pub total_received: Quantity,
    pub dispatch_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub daily_stock: DailyStock,
    pub history: Vec<DailyStock>,
    pub current_balance: Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesHistory {
    pub sales: Vec<Sale>,
    pub total: Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseHistory {
    pub purchases: Vec<Purchase>,
    pub total: Quantity,
    pub reward_eligible: Quantity,
}

/// Which side of a dispatch the caller is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchView {
    Dealer(UserId),
    Aso(UserId),
}

/// Which side of a sale the caller is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleView {
    Dealer(UserId),
    Barbender(UserId),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DispatchFilter {
    pub status: Option<DispatchStatus>,
}
