//! # OTP Authentication & Session Token Subsystem
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Phone-based login for pre-provisioned identities: issues short-lived
//! six-digit codes, throttles requests per phone, verifies codes and hands
//! out HMAC-SHA256 signed session tokens bound to the opaque user id.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | One live code per phone key | `adapters/memory.rs` - `upsert()` |
//! | Code consumed exactly once | `adapters/memory.rs` - `attempt()` under entry lock |
//! | At most 5 failed attempts | `domain/otp.rs` - `apply_attempt()` |
//! | 60s cooldown, 10 sends per window | `domain/rate_limit.rs` - `admit()` |
//! | Closed registration | `service.rs` - `known_identity()` |
//! | Tokens re-checked against live identity | `service.rs` - `live_subject()` |
//!
//! ## Send / Verify Flow
//!
//! ```text
//! send_code ──→ lookup phone ──→ [rate check + code upsert + counter++] ──→ SMS (best effort)
//!                                        (one entry lock per phone key)
//!
//! verify_code ──→ lookup phone ──→ [expiry → exhaustion → compare] ──→ activate ──→ token
//! ```
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `IdentityDirectory` | Phone lookup, PENDING→ACTIVE activation |
//! | `SmsSender` | Code delivery; failure only flips `smsStatus` to `pending` |
//! | `OtpStore`, `RateLimitStore` | Keyed stores with TTL emulation |

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{LoggingSmsSender, MemoryOtpStore, MemoryRateLimitStore, RecordingSmsSender};
pub use domain::*;
pub use ports::{IdentityDirectory, OtpAuthApi, OtpStore, RateLimitStore, SmsSender};
pub use service::{OtpAuthService, PurgeReport};
