//! Login identities and the results handed back to callers

use serde::{Deserialize, Serialize};
use shared_types::{PhoneNumber, Principal, Role, Timestamp, UserId, UserStatus};

/// What the auth subsystem needs to know about a provisioned user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginIdentity {
    pub id: UserId,
    pub name: String,
    pub phone_no: PhoneNumber,
    pub country_code: String,
    pub role: Role,
    pub status: UserStatus,
}

impl LoginIdentity {
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            role: self.role,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsStatus {
    Sent,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCodeOutcome {
    pub message: String,
    /// Seconds until the code expires
    pub expires_in: u64,
    pub role: Role,
    pub role_name: String,
    pub sms_status: SmsStatus,
}

/// Successful OTP login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub message: String,
    pub token: String,
    pub expires_at: Timestamp,
    pub user_id: UserId,
    /// True when this login activated a PENDING identity
    pub is_new_user: bool,
    pub user: LoginIdentity,
    pub welcome_message: String,
}

/// Result of token refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshedToken {
    pub token: String,
    pub expires_at: Timestamp,
    pub user: LoginIdentity,
}
