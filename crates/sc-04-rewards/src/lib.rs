//! # Reward Engine Subsystem
//!
//! **Subsystem ID:** 4
//!
//! ## Purpose
//!
//! Turns monthly sales volume into reward kilograms for dealers and
//! barbenders. Volume is read from the stock ledger and rewards are
//! credited back through it; this crate only remembers what was claimed.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Only whole 100 kg blocks count | `domain/calc.rs` - `eligible()` |
//! | Reward floored to whole kg | `domain/calc.rs` - `reward_for()` |
//! | Eligible volume paid at most once per period | `adapters/memory.rs` - `claim_with()` |
//! | Only dealers and barbenders earn | `service.rs` - `beneficiary()` |
//!
//! ## Claim Flow
//!
//! ```text
//! claim ──→ [lock (user, period)] ──→ recompute volume ──→ subtract claimed
//!                                                              │
//!          record reward + claimed += covered ←── ledger credit ┘
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::MemoryRewardStore;
pub use domain::*;
pub use ports::{BeneficiaryDirectory, RewardAccounts, RewardApi, RewardStore};
pub use service::RewardService;
