//! # Inbound Port - IdentityApi
//!
//! Primary driving port of the identity subsystem. Operations that act on
//! behalf of a caller take the caller's [`Principal`] and enforce the
//! capability policy themselves, because they need the target record to
//! decide.

use crate::domain::{AsoDealers, DealerMapping, IdentityResult, NewUser, QrPayload, ReconcileReport, User};
use shared_types::{PhoneNumber, Principal, UserId, UserStatus};

pub trait IdentityApi: Send + Sync {
    // --- provisioning and lifecycle ---

    /// Creates a PENDING identity. SA creates ASOs and Dealers, a Dealer
    /// creates its own Barbenders.
    fn provision_user(&self, actor: &Principal, request: &NewUser) -> IdentityResult<User>;

    /// Block, unblock or delete a subordinate.
    fn set_status(&self, actor: &Principal, target: UserId, status: UserStatus) -> IdentityResult<User>;

    /// PENDING→ACTIVE on first successful OTP verification; stamps the login time.
    /// Returns the user and whether it was PENDING before.
    fn activate_on_login(&self, id: UserId) -> IdentityResult<(User, bool)>;

    // --- lookups ---

    fn get_user(&self, id: UserId) -> IdentityResult<User>;

    fn find_by_phone(&self, phone: &PhoneNumber) -> Option<User>;

    /// Live role and status of a user, for per-request authorization.
    fn principal(&self, id: UserId) -> IdentityResult<Principal>;

    fn barbenders_of(&self, actor: &Principal) -> IdentityResult<Vec<User>>;

    fn qr_payload(&self, actor: &Principal, target: UserId) -> IdentityResult<QrPayload>;

    // --- mapping registry ---

    fn map_dealer_to_aso(&self, actor: &Principal, aso: UserId, dealer: UserId) -> IdentityResult<DealerMapping>;

    /// Idempotent: unmapping an unmapped dealer returns `Ok(None)`.
    fn unmap_dealer(&self, actor: &Principal, dealer: UserId) -> IdentityResult<Option<DealerMapping>>;

    fn reconcile(&self, actor: &Principal) -> IdentityResult<ReconcileReport>;

    fn active_mappings(&self, actor: &Principal) -> IdentityResult<Vec<DealerMapping>>;

    fn unmapped_dealers(&self, actor: &Principal) -> IdentityResult<Vec<User>>;

    fn asos_with_dealers(&self, actor: &Principal) -> IdentityResult<Vec<AsoDealers>>;

    /// Dealers mapped to the calling ASO.
    fn assigned_dealers(&self, actor: &Principal) -> IdentityResult<Vec<User>>;
}
