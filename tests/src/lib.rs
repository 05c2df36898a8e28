//! # Steel-Chain Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Cross-subsystem flows over the wired node
//!     ├── fixtures.rs   # Node container on a mock clock, OTP login helper
//!     ├── auth_flows.rs
//!     ├── mapping_flows.rs
//!     ├── stock_flows.rs
//!     ├── reward_flows.rs
//!     └── http_flows.rs # Same flows through the axum router
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p sc-tests
//!
//! # By category
//! cargo test -p sc-tests integration::stock_flows::
//!
//! # Benchmarks
//! cargo bench -p sc-tests
//! ```

pub mod integration;
