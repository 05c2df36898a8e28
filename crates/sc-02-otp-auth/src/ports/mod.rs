//! Ports layer for the OTP and token subsystem

pub mod inbound;
pub mod outbound;

pub use inbound::OtpAuthApi;
pub use outbound::{IdentityDirectory, OtpStore, RateLimitStore, SmsSender};
