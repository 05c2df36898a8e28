//! Dealer→barbender sales and barbender purchases from outside sources.

use serde::{Deserialize, Serialize};
use shared_types::{ProductId, PurchaseId, Quantity, SaleId, Timestamp, UserId};

/// Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub dealer_id: UserId,
    pub barbender_id: UserId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub sold_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Steel a barbender bought from a vendor outside the dealer network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: PurchaseId,
    pub barbender_id: UserId,
    pub source_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub quantity: Quantity,
    pub purchased_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
