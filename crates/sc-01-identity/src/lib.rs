//! # Identity & Mapping Registry Subsystem
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Holds the pre-provisioned identities (keyed by phone number), their
//! two-phase lifecycle, the ASO↔Dealer hierarchy edges and the capability
//! policy every request is checked against.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Phone number unique | `domain/book.rs` - `insert()` |
//! | Role immutable | no setter exists on `User::role` |
//! | DELETED is terminal | `domain/user.rs` - `validate_transition()` |
//! | One active ASO per dealer | `domain/book.rs` - `map_dealer()` |
//! | No dangling mapping references | `domain/book.rs` - `unmap_dealer()`, `reconcile()` |
//!
//! ## Identity Lifecycle
//!
//! Identities are never created implicitly by a login. A superior provisions
//! a PENDING shell; the first successful OTP verification activates it.
//!
//! ```text
//! [PENDING] ──first OTP login──→ [ACTIVE] ──block──→ [BLOCKED]
//!     │                             ↑ └──── unblock ─────┘
//!     └─────────── delete ──────────┴──→ [DELETED] (terminal)
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service.rs         - IdentityService (RwLock<IdentityBook>)    │
//! │  policy.rs          - authorize(principal, action)              │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs   - IdentityApi trait                         │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/user.rs     - User, NewUser, status transitions         │
//! │  domain/mapping.rs  - DealerMapping, ReconcileReport            │
//! │  domain/book.rs     - IdentityBook (users, phone index, edges)  │
//! │  domain/errors.rs   - IdentityError                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod domain;
pub mod policy;
pub mod ports;
pub mod service;

pub use domain::*;
pub use policy::{authorize, Action};
pub use ports::IdentityApi;
pub use service::IdentityService;
