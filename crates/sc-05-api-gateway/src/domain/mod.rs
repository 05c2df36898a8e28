//! Gateway domain: configuration and the API error model.

pub mod config;
pub mod error;

pub use config::{ConfigError, CorsConfig, GatewayConfig};
pub use error::{status_for, ApiError, ApiResult, GatewayError};
