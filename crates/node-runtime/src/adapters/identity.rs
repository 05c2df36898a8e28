//! Identity adapters.
//!
//! The identity store is the only owner of user records. These adapters
//! project a user onto the narrow views the OTP, stock-ledger and reward
//! subsystems declare in their outbound ports.

use std::sync::Arc;

use sc_01_identity::{IdentityApi, IdentityError, User};
use sc_02_otp_auth::{AuthError, AuthResult, IdentityDirectory, LoginIdentity};
use sc_03_stock_ledger::{Party, PartyDirectory};
use sc_04_rewards::{Beneficiary, BeneficiaryDirectory};
use shared_types::{PhoneNumber, UserId};
use tracing::warn;

fn login_identity(user: &User) -> LoginIdentity {
    LoginIdentity {
        id: user.id,
        name: user.name.clone(),
        phone_no: user.phone_no.clone(),
        country_code: user.country_code.clone(),
        role: user.role,
        status: user.status,
    }
}

/// Implements the OTP subsystem's `IdentityDirectory` over the identity store.
pub struct LoginDirectoryAdapter {
    identity: Arc<dyn IdentityApi>,
}

impl LoginDirectoryAdapter {
    pub fn new(identity: Arc<dyn IdentityApi>) -> Self {
        Self { identity }
    }
}

impl IdentityDirectory for LoginDirectoryAdapter {
    fn lookup(&self, phone: &PhoneNumber) -> Option<LoginIdentity> {
        self.identity.find_by_phone(phone).map(|u| login_identity(&u))
    }

    fn resolve(&self, id: UserId) -> Option<LoginIdentity> {
        self.identity.get_user(id).ok().map(|u| login_identity(&u))
    }

    fn activate(&self, id: UserId) -> AuthResult<(LoginIdentity, bool)> {
        self.identity
            .activate_on_login(id)
            .map(|(user, was_pending)| (login_identity(&user), was_pending))
            .map_err(|err| match err {
                IdentityError::UserNotFound(_) => AuthError::UserNotFound,
                IdentityError::AccountBlocked => AuthError::AccountBlocked,
                IdentityError::AccountDeleted => AuthError::AccountDeleted,
                other => {
                    warn!(subsystem = "node-runtime", user_id = %id, error = %other, "Activation failed");
                    AuthError::Internal(other.to_string())
                }
            })
    }
}

/// Implements the stock ledger's `PartyDirectory` over the identity store.
pub struct PartyDirectoryAdapter {
    identity: Arc<dyn IdentityApi>,
}

impl PartyDirectoryAdapter {
    pub fn new(identity: Arc<dyn IdentityApi>) -> Self {
        Self { identity }
    }
}

impl PartyDirectory for PartyDirectoryAdapter {
    fn party(&self, id: UserId) -> Option<Party> {
        let user = self.identity.get_user(id).ok()?;
        Some(Party {
            id: user.id,
            owner_dealer: user.owner_dealer(),
            assigned_aso: user.assigned_aso,
            role: user.role,
            status: user.status,
            name: user.name,
        })
    }
}

/// Implements the reward engine's `BeneficiaryDirectory` over the identity store.
pub struct BeneficiaryDirectoryAdapter {
    identity: Arc<dyn IdentityApi>,
}

impl BeneficiaryDirectoryAdapter {
    pub fn new(identity: Arc<dyn IdentityApi>) -> Self {
        Self { identity }
    }
}

impl BeneficiaryDirectory for BeneficiaryDirectoryAdapter {
    fn beneficiary(&self, id: UserId) -> Option<Beneficiary> {
        let user = self.identity.get_user(id).ok()?;
        Some(Beneficiary {
            id: user.id,
            name: user.name,
            role: user.role,
            status: user.status,
        })
    }
}
