//! # API Gateway Subsystem
//!
//! **Subsystem ID:** 5
//!
//! HTTP/JSON surface over the identity, OTP, stock-ledger and reward
//! subsystems. Holds no state of its own beyond the handles in
//! [`AppState`].
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     API GATEWAY (sc-05)                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Middleware Stack                                             │
//! │  Trace → CORS → Timeout → Body limit                          │
//! │                     │                                         │
//! │  Extractors: Caller (bearer → live identity), ApiJson, ...    │
//! │                     │                                         │
//! │  Handlers ── authorize(principal, Action) ── subsystem call   │
//! │                     │                                         │
//! │  ApiError ── kind → HTTP status, api_errors_total{kind}       │
//! └─────────────────────┼────────────────────────────────────────┘
//!        ┌──────────────┼──────────────┬──────────────┐
//!        ▼              ▼              ▼              ▼
//!   sc-01-identity  sc-02-otp-auth  sc-03-stock-ledger  sc-04-rewards
//! ```
//!
//! ## Authentication
//!
//! Every protected route resolves its bearer token to the live identity,
//! so blocking or deleting a user takes effect on the next request.
//! `/auth/refresh-token` alone accepts an expired (but authentic) token.
//!
//! ## Usage
//!
//! ```ignore
//! use sc_05_api_gateway::{serve, AppState, GatewayConfig};
//!
//! let state = AppState { identity, auth, ledger, rewards };
//! serve(&GatewayConfig::default(), state, shutdown_signal()).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use domain::{ApiError, ApiResult, ConfigError, CorsConfig, GatewayConfig, GatewayError};
pub use middleware::Caller;
pub use router::{build_router, AppState};
pub use server::serve;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
