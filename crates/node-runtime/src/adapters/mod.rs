//! # Port Adapters
//!
//! Subsystems never depend on each other's crates. Each declares the
//! outbound ports it needs; the adapters here implement those ports on top
//! of the owning subsystem's inbound API.
//!
//! | Adapter | Port | Backed by |
//! |---------|------|-----------|
//! | [`LoginDirectoryAdapter`] | `sc-02::IdentityDirectory` | identity store |
//! | [`PartyDirectoryAdapter`] | `sc-03::PartyDirectory` | identity store |
//! | [`BeneficiaryDirectoryAdapter`] | `sc-04::BeneficiaryDirectory` | identity store |
//! | [`RewardAccountsAdapter`] | `sc-04::RewardAccounts` | stock ledger |

mod identity;
mod ledger;

pub use identity::{BeneficiaryDirectoryAdapter, LoginDirectoryAdapter, PartyDirectoryAdapter};
pub use ledger::RewardAccountsAdapter;
