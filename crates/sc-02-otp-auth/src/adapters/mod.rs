//! Adapters for the OTP and token subsystem

pub mod memory;
pub mod sms;

pub use memory::{MemoryOtpStore, MemoryRateLimitStore};
pub use sms::{LoggingSmsSender, RecordingSmsSender};
