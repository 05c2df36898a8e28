//! Route handlers, one module per resource.

pub mod auth;
pub mod mappings;
pub mod products;
pub mod rewards;
pub mod stock;
pub mod system;
pub mod users;
