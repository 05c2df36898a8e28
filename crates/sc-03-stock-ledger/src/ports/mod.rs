//! Ports layer for the Stock Ledger subsystem

pub mod inbound;
pub mod outbound;

pub use inbound::StockLedgerApi;
pub use outbound::PartyDirectory;
