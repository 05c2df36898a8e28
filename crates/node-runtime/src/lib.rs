//! # Node Runtime Library
//!
//! This library exposes the internal modules of the node runtime for testing.
//! The main entry point is the `main.rs` binary (`steel-node`).
//!
//! ## Architectural Patterns
//!
//! - **DDD (Domain-Driven Design)**: Each subsystem owns its domain logic
//! - **Hexagonal Architecture**: Ports define contracts, Adapters implement them
//! - **Composition root**: only this crate depends on every subsystem

#![allow(clippy::type_complexity)]

pub mod adapters;
pub mod container;
pub mod maintenance;
pub mod metrics;

pub use container::{ConfigError, MaintenanceReport, NodeConfig, SeedError, SubsystemContainer};
