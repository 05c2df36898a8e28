//! User identity records

use super::errors::{IdentityError, IdentityResult};
use serde::{Deserialize, Serialize};
use shared_types::{
    normalize_country_code, PhoneNumber, Role, Timestamp, UserId, UserStatus, DEFAULT_COUNTRY_CODE,
};
use std::collections::BTreeSet;

/// A provisioned identity.
///
/// Balances are not stored here; the stock ledger owns them and the API
/// projects them onto the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub phone_no: PhoneNumber,
    pub country_code: String,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    /// Dealer only: the ASO this dealer is currently mapped to.
    pub assigned_aso: Option<UserId>,
    /// ASO only: dealers currently mapped to this ASO.
    pub mapped_dealers: BTreeSet<UserId>,
    /// Barbender: owning dealer. Staff: the provisioning admin.
    pub created_by: Option<UserId>,
    #[serde(rename = "lastOTPValidated")]
    pub last_otp_validated: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Owning dealer of a barbender.
    pub fn owner_dealer(&self) -> Option<UserId> {
        match self.role {
            Role::Barbender => self.created_by,
            _ => None,
        }
    }

    /// Fails with the account-state error that forbids logging in.
    pub fn ensure_can_login(&self) -> IdentityResult<()> {
        match self.status {
            UserStatus::Blocked => Err(IdentityError::AccountBlocked),
            UserStatus::Deleted => Err(IdentityError::AccountDeleted),
            UserStatus::Pending | UserStatus::Active => Ok(()),
        }
    }

    pub fn ensure_role(&self, expected: Role) -> IdentityResult<()> {
        if self.role != expected {
            return Err(IdentityError::WrongRole {
                user: self.id,
                expected,
                actual: self.role,
            });
        }
        Ok(())
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            phone_no: self.phone_no.clone(),
            country_code: self.country_code.clone(),
            role: self.role,
            role_name: self.role.display_name().to_string(),
            status: self.status,
        }
    }
}

/// Public view of a user returned by most endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub phone_no: PhoneNumber,
    pub country_code: String,
    pub role: Role,
    pub role_name: String,
    pub status: UserStatus,
}

/// Provisioning request for a new PENDING identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub phone_no: String,
    #[serde(default)]
    pub country_code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
}

impl NewUser {
    /// Validates and normalizes the raw request fields.
    pub fn normalize(&self) -> IdentityResult<(PhoneNumber, String, String, Option<String>)> {
        let phone = PhoneNumber::parse(&self.phone_no)?;
        let country_code = match self.country_code.as_deref().map(str::trim) {
            Some(cc) if !cc.is_empty() => normalize_country_code(cc)?,
            _ => DEFAULT_COUNTRY_CODE.to_string(),
        };
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(shared_types::ValidationError::MissingField("name").into());
        }
        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        if let Some(email) = &email {
            if !email.contains('@') {
                return Err(shared_types::ValidationError::Invalid {
                    field: "email",
                    reason: email.clone(),
                }
                .into());
            }
        }
        Ok((phone, country_code, name, email))
    }
}

/// JSON identity card encoded into a user's QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub user_id: UserId,
    pub name: String,
    pub phone_no: PhoneNumber,
    pub role: Role,
    pub dealer_id: Option<UserId>,
    pub generated_at: Timestamp,
}

/// Checks a superior-initiated status change.
pub fn validate_transition(from: UserStatus, to: UserStatus) -> IdentityResult<()> {
    use UserStatus::*;
    let allowed = matches!(
        (from, to),
        (Pending, Blocked)
            | (Pending, Deleted)
            | (Active, Blocked)
            | (Active, Deleted)
            | (Blocked, Active)
            | (Blocked, Deleted)
    );
    if allowed {
        Ok(())
    } else {
        Err(IdentityError::InvalidTransition { from, to })
    }
}

/// Status a blocked user is reinstated to. Only an OTP login ever makes a
/// user ACTIVE, so one who never logged in goes back to PENDING.
pub fn reinstated_status(last_otp_validated: Option<Timestamp>) -> UserStatus {
    match last_otp_validated {
        Some(_) => UserStatus::Active,
        None => UserStatus::Pending,
    }
}
