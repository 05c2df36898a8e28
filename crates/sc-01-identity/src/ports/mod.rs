//! Ports layer for the Identity subsystem

pub mod inbound;

pub use inbound::IdentityApi;
