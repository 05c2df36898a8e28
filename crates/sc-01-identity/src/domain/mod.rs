//! Domain layer for the Identity subsystem

pub mod book;
pub mod errors;
pub mod mapping;
pub mod user;

pub use book::{IdentityBook, UserDraft};
pub use errors::{IdentityError, IdentityResult};
pub use mapping::{AsoDealers, DealerMapping, ReconcileReport};
pub use user::{validate_transition, NewUser, QrPayload, User, UserSummary};
