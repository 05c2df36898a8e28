//! Adapters for the Reward subsystem

pub mod memory;

pub use memory::MemoryRewardStore;
