//! # Shared Types Crate
//!
//! This crate contains the domain vocabulary shared by every Steel-Chain
//! subsystem: identifiers, the role hierarchy, phone keys, fixed-point
//! quantities and the clock abstraction.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **No Subsystem Coupling**: Subsystem crates depend on this crate only,
//!   never on each other. The node runtime bridges them through ports.
//! - **Integer Arithmetic**: Quantities are grams in a `u64`, so balance
//!   conservation never depends on floating-point rounding.

pub mod entities;
pub mod errors;
pub mod quantity;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use quantity::*;
pub use time::*;
