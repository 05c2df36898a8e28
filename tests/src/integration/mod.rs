//! # Integration Flows
//!
//! Every test here runs against a [`node_runtime::SubsystemContainer`], so
//! the subsystems talk through the same port adapters as the binary.

#[cfg(test)]
pub mod fixtures;

mod auth_flows;
mod http_flows;
mod mapping_flows;
mod reward_flows;
mod stock_flows;
