//! # Core Domain Entities
//!
//! Defines the identifiers and small value types every subsystem agrees on.
//!
//! ## Clusters
//!
//! - **Identity**: `UserId`, `Role`, `UserStatus`, `Principal`
//! - **Phone**: `PhoneNumber`, `PhoneKey`
//! - **Records**: `MappingId`, `ProductId`, `DispatchId`, `SaleId`,
//!   `PurchaseId`, `RewardId`

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// CLUSTER A: IDENTIFIERS
// =============================================================================

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| ValidationError::InvalidId(s.to_string()))
            }
        }
    };
}

define_id!(
    /// Opaque identity of a user. Tokens bind to this, never to the phone.
    UserId
);
define_id!(
    /// Audit record of an ASO↔Dealer mapping.
    MappingId
);
define_id!(
    /// Catalog product.
    ProductId
);
define_id!(
    /// Stock movement from an ASO to a Dealer.
    DispatchId
);
define_id!(
    /// Stock movement from a Dealer to a Barbender.
    SaleId
);
define_id!(
    /// Barbender purchase from an outside vendor.
    PurchaseId
);
define_id!(
    /// Committed reward claim.
    RewardId
);

// =============================================================================
// CLUSTER B: ROLE HIERARCHY
// =============================================================================

/// Fixed role hierarchy. The wire codes match the mobile clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "SA")]
    SuperAdmin,
    #[serde(rename = "ASO")]
    Aso,
    #[serde(rename = "DLR")]
    Dealer,
    #[serde(rename = "BBR")]
    Barbender,
}

impl Role {
    /// Wire code (`SA`, `ASO`, `DLR`, `BBR`).
    pub const fn code(self) -> &'static str {
        match self {
            Self::SuperAdmin => "SA",
            Self::Aso => "ASO",
            Self::Dealer => "DLR",
            Self::Barbender => "BBR",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::Aso => "ASO",
            Self::Dealer => "Dealer",
            Self::Barbender => "Barbender",
        }
    }

    /// Greeting shown after a successful login.
    pub fn welcome_message(self) -> String {
        format!("Welcome, {}!", self.display_name())
    }

    /// Only dealers and barbenders accrue rewards.
    pub const fn earns_rewards(self) -> bool {
        matches!(self, Self::Dealer | Self::Barbender)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "SA" | "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "ASO" => Ok(Self::Aso),
            "DLR" | "DEALER" => Ok(Self::Dealer),
            "BBR" | "BARBENDER" => Ok(Self::Barbender),
            other => Err(ValidationError::InvalidRole(other.to_string())),
        }
    }
}

/// Account lifecycle state.
///
/// ```text
/// [PENDING] ──first OTP login──→ [ACTIVE] ⇄ [BLOCKED]
///     │                             │           │
///     └──────────────→ [DELETED] ←──┴───────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Pending,
    Active,
    Blocked,
    Deleted,
}

impl UserStatus {
    /// PENDING shells may log in (that is how they activate).
    pub const fn can_login(self) -> bool {
        matches!(self, Self::Pending | Self::Active)
    }

    pub const fn can_transact(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Blocked => "blocked",
            Self::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// The authenticated caller of an operation, resolved from a live identity
/// record on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
    pub status: UserStatus,
}

impl Principal {
    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }
}

// =============================================================================
// CLUSTER C: PHONE IDENTITY
// =============================================================================

/// Default country code applied when a client omits it.
pub const DEFAULT_COUNTRY_CODE: &str = "91";

/// A validated national phone number: 10 to 15 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingField("phoneNo"));
        }
        let valid = (10..=15).contains(&trimmed.len()) && trimmed.bytes().all(|b| b.is_ascii_digit());
        if !valid {
            return Err(ValidationError::InvalidPhone(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

/// Trims and drops a leading `+`: `" +91 "` becomes `"91"`.
pub fn normalize_country_code(raw: &str) -> Result<String, ValidationError> {
    let cc = raw.trim().trim_start_matches('+');
    if cc.is_empty() {
        return Err(ValidationError::MissingField("countryCode"));
    }
    if cc.len() > 4 || !cc.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidCountryCode(raw.trim().to_string()));
    }
    Ok(cc.to_string())
}

/// Canonical lookup key for OTP and rate-limit records: `"{cc}-{phone}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneKey(String);

impl PhoneKey {
    pub fn new(country_code: &str, phone: &PhoneNumber) -> Self {
        Self(format!("{}-{}", country_code.trim(), phone.as_str()))
    }

    /// Parses raw request fields. Both are required.
    pub fn parse(country_code: &str, phone_no: &str) -> Result<(Self, PhoneNumber), ValidationError> {
        let cc = normalize_country_code(country_code)?;
        let phone = PhoneNumber::parse(phone_no)?;
        Ok((Self::new(&cc, &phone), phone))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
