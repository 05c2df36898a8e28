//! SMS sender adapters.
//!
//! No real gateway is wired in. `LoggingSmsSender` writes the code to the
//! log (development mode) and `RecordingSmsSender` keeps the last code per
//! phone so tests and local tooling can complete a login.

use crate::ports::SmsSender;
use async_trait::async_trait;
use dashmap::DashMap;
use shared_types::PhoneKey;

/// Logs every code at INFO. Never use with real users.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSmsSender;

#[async_trait]
impl SmsSender for LoggingSmsSender {
    async fn send(&self, key: &PhoneKey, code: &str) -> bool {
        tracing::info!(
            subsystem = "otp-auth",
            phone_key = %key,
            code = %code,
            "OTP delivery (log only)"
        );
        true
    }
}

/// Remembers the last code per phone; optionally reports delivery failure.
#[derive(Debug, Default)]
pub struct RecordingSmsSender {
    sent: DashMap<PhoneKey, String>,
    fail_delivery: bool,
}

impl RecordingSmsSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose gateway is "down": codes are recorded, `send` returns false.
    pub fn failing() -> Self {
        Self {
            sent: DashMap::new(),
            fail_delivery: true,
        }
    }

    pub fn last_code(&self, key: &PhoneKey) -> Option<String> {
        self.sent.get(key).map(|c| c.value().clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.len()
    }
}

#[async_trait]
impl SmsSender for RecordingSmsSender {
    async fn send(&self, key: &PhoneKey, code: &str) -> bool {
        self.sent.insert(key.clone(), code.to_string());
        !self.fail_delivery
    }
}
