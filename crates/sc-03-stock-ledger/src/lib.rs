//! # Stock Ledger Subsystem
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! Owns every stock balance in the system. Steel enters a dealer's account
//! when a dispatch is received, leaves it when sold to a barbender, and
//! enters a barbender's account through sales and external purchases.
//! Balances are folds over an append-only entry log.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | `availableQty >= 0` | `domain/ledger.rs` - `post()` |
//! | Multi-leg postings all-or-nothing | `domain/ledger.rs` - `post()` |
//! | Dispatch received at most once | `domain/dispatch.rs` - `ensure_pending()` |
//! | Dispatch only to a mapped dealer | `domain/book.rs` - `dispatch()` |
//! | Sale only to the dealer's own barbender | `domain/book.rs` - `sell()` |
//! | Daily closing equals available balance | `domain/daily.rs`, `book.rs` - `verify_integrity()` |
//! | Unique product code | `domain/product.rs` - `create()` |
//!
//! ## Stock Flow
//!
//! ```text
//!   ASO ──dispatch──→ [PENDING] ──receive──→ Dealer.available  (+qty)
//!                         │
//!                         └──cancel──→ [CANCELLED]
//!
//!   Dealer.available ──sell──→ Barbender.available   (+qty)
//!        (-qty)          │     Barbender.rewardEligible (+qty)
//!                        └──→  Dealer.rewardEligible (+qty)
//!
//!   vendor ──purchase──→ Barbender.available + rewardEligible
//!   reward claim ──────→ rewardEligible
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service.rs          - StockLedgerService (Mutex<StockBook>)    │
//! └─────────────────────────────────────────────────────────────────┘
//!                 ↑ implements ↑              ↓ uses ↓
//! ┌──────────────────────────────┐ ┌────────────────────────────────┐
//! │  ports/inbound.rs            │ │  ports/outbound.rs             │
//! │  StockLedgerApi              │ │  PartyDirectory                │
//! └──────────────────────────────┘ └────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/ledger.rs    - Ledger, LedgerEntry, Posting             │
//! │  domain/dispatch.rs  - StockDispatch, DispatchStatus            │
//! │  domain/sale.rs      - Sale, Purchase                           │
//! │  domain/daily.rs     - DailyBook, DailyStock                    │
//! │  domain/product.rs   - ProductCatalog, sample products          │
//! │  domain/book.rs      - StockBook (validate, post, store)        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::{PartyDirectory, StockLedgerApi};
pub use service::StockLedgerService;
