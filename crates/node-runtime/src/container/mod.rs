//! # Subsystem Container
//!
//! Central container holding all subsystem instances with proper
//! lifetime management and dependency injection.
//!
//! - Subsystems initialized in dependency order (Level 0 → Level 3)
//! - Subsystems reach each other only through port adapters
//! - Adapters implement outbound ports for each subsystem

pub mod config;
pub mod subsystems;

pub use config::{BootstrapConfig, ConfigError, MaintenanceConfig, NodeConfig};
pub use subsystems::{MaintenanceReport, SeedError, SubsystemContainer};
