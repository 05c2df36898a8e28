//! Domain layer for the Stock Ledger subsystem

pub mod book;
pub mod daily;
pub mod dispatch;
pub mod errors;
pub mod ledger;
pub mod party;
pub mod product;
pub mod requests;
pub mod sale;

pub use book::StockBook;
pub use daily::{DailyBook, DailyMovement, DailyStock};
pub use dispatch::{DispatchStatus, StockDispatch};
pub use errors::{LedgerError, LedgerResult};
pub use ledger::{
    AccountKey, BalanceKind, Balances, EntryCause, IntegrityReport, Ledger, LedgerEntry, Posting,
};
pub use party::Party;
pub use product::{
    sample_products, NewProduct, Product, ProductCatalog, ProductCategory, ProductFilter,
    ProductUnit, ProductUpdate, SeedReport,
};
pub use requests::{
    DailyReport, DispatchFilter, DispatchHistory, DispatchRequest, DispatchView, PurchaseHistory,
    PurchaseOutcome, PurchaseRequest, ReceiveOutcome, ReceivedDay, SaleOutcome, SaleRequest,
    SaleView, SalesHistory,
};
pub use sale::{Purchase, Sale};
