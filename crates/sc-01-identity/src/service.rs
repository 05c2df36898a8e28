//! Identity Service - users, lifecycle and the mapping registry

use crate::domain::{
    AsoDealers, DealerMapping, IdentityBook, IdentityError, IdentityResult, NewUser, QrPayload,
    ReconcileReport, User, UserDraft,
};
use crate::policy::{authorize, Action};
use crate::ports::IdentityApi;
use parking_lot::RwLock;
use shared_types::{
    PhoneNumber, Principal, Role, SystemTimeSource, TimeSource, UserId, UserStatus,
};
use std::sync::Arc;

/// Identity store and mapping registry behind one lock.
pub struct IdentityService {
    book: RwLock<IdentityBook>,
    clock: Arc<dyn TimeSource>,
}

impl Default for IdentityService {
    fn default() -> Self {
        Self::new(Arc::new(SystemTimeSource))
    }
}

impl IdentityService {
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            book: RwLock::new(IdentityBook::new()),
            clock,
        }
    }

    /// Ensures a super admin exists for `phone`. Idempotent across restarts
    /// of the seeding step; an existing user with that phone is returned
    /// unchanged.
    pub fn bootstrap_super_admin(
        &self,
        phone: PhoneNumber,
        country_code: &str,
        name: &str,
    ) -> IdentityResult<User> {
        let mut book = self.book.write();
        if let Some(existing) = book.find_by_phone(&phone) {
            return Ok(existing.clone());
        }
        let user = book.insert(
            UserDraft {
                phone_no: phone,
                country_code: country_code.to_string(),
                name: name.to_string(),
                email: None,
                role: Role::SuperAdmin,
                created_by: None,
            },
            self.clock.now(),
        )?;
        tracing::info!(subsystem = "identity", user_id = %user.id, "Super admin seeded");
        Ok(user)
    }

    pub fn user_count(&self) -> usize {
        self.book.read().len()
    }
}

impl IdentityApi for IdentityService {
    fn provision_user(&self, actor: &Principal, request: &NewUser) -> IdentityResult<User> {
        authorize(actor, Action::ProvisionUser { role: request.role })?;
        let (phone_no, country_code, name, email) = request.normalize()?;
        let created_by = Some(actor.id);
        let user = self.book.write().insert(
            UserDraft {
                phone_no,
                country_code,
                name,
                email,
                role: request.role,
                created_by,
            },
            self.clock.now(),
        )?;
        tracing::info!(
            subsystem = "identity",
            user_id = %user.id,
            role = %user.role,
            created_by = %actor.id,
            "User provisioned"
        );
        Ok(user)
    }

    fn set_status(
        &self,
        actor: &Principal,
        target: UserId,
        status: UserStatus,
    ) -> IdentityResult<User> {
        let mut book = self.book.write();
        let current = book.get(&target)?;
        authorize(
            actor,
            Action::ChangeUserStatus {
                target,
                target_role: current.role,
                target_owner: current.owner_dealer(),
            },
        )?;
        let user = book.set_status(&target, status, self.clock.now())?;
        tracing::info!(
            subsystem = "identity",
            user_id = %target,
            status = %user.status,
            actor = %actor.id,
            "User status changed"
        );
        Ok(user)
    }

    fn activate_on_login(&self, id: UserId) -> IdentityResult<(User, bool)> {
        let (user, was_pending) = self.book.write().activate(&id, self.clock.now())?;
        if was_pending {
            tracing::info!(subsystem = "identity", user_id = %id, "User activated on first login");
        }
        Ok((user, was_pending))
    }

    fn get_user(&self, id: UserId) -> IdentityResult<User> {
        self.book.read().get(&id).cloned()
    }

    fn find_by_phone(&self, phone: &PhoneNumber) -> Option<User> {
        self.book.read().find_by_phone(phone).cloned()
    }

    fn principal(&self, id: UserId) -> IdentityResult<Principal> {
        let book = self.book.read();
        let user = book.get(&id)?;
        Ok(Principal {
            id: user.id,
            role: user.role,
            status: user.status,
        })
    }

    fn barbenders_of(&self, actor: &Principal) -> IdentityResult<Vec<User>> {
        authorize(actor, Action::ListOwnBarbenders)?;
        Ok(self.book.read().barbenders_of(&actor.id))
    }

    fn qr_payload(&self, actor: &Principal, target: UserId) -> IdentityResult<QrPayload> {
        let book = self.book.read();
        let user = book.get(&target)?;
        authorize(
            actor,
            Action::ViewQr {
                target,
                target_owner: user.owner_dealer(),
            },
        )?;
        if user.status == UserStatus::Deleted {
            return Err(IdentityError::UserNotFound(target));
        }
        Ok(QrPayload {
            user_id: user.id,
            name: user.name.clone(),
            phone_no: user.phone_no.clone(),
            role: user.role,
            dealer_id: user.owner_dealer(),
            generated_at: self.clock.now(),
        })
    }

    fn map_dealer_to_aso(
        &self,
        actor: &Principal,
        aso: UserId,
        dealer: UserId,
    ) -> IdentityResult<DealerMapping> {
        authorize(actor, Action::ManageMappings)?;
        let mapping = self
            .book
            .write()
            .map_dealer(actor.id, aso, dealer, self.clock.now())?;
        tracing::info!(
            subsystem = "identity",
            mapping_id = %mapping.id,
            aso = %aso,
            dealer = %dealer,
            "Dealer mapped to ASO"
        );
        Ok(mapping)
    }

    fn unmap_dealer(
        &self,
        actor: &Principal,
        dealer: UserId,
    ) -> IdentityResult<Option<DealerMapping>> {
        authorize(actor, Action::ManageMappings)?;
        let removed = self.book.write().unmap_dealer(&dealer, self.clock.now())?;
        match &removed {
            Some(m) => tracing::info!(
                subsystem = "identity",
                aso = %m.aso,
                dealer = %dealer,
                "Dealer unmapped"
            ),
            None => tracing::debug!(subsystem = "identity", dealer = %dealer, "Dealer was not mapped"),
        }
        Ok(removed)
    }

    fn reconcile(&self, actor: &Principal) -> IdentityResult<ReconcileReport> {
        authorize(actor, Action::ManageMappings)?;
        let report = self.book.write().reconcile(actor.id, self.clock.now());
        if report.is_clean() {
            tracing::info!(subsystem = "identity", "Mapping reconcile found nothing to repair");
        } else {
            tracing::warn!(
                subsystem = "identity",
                repairs = report.total_repairs(),
                "Mapping reconcile repaired inconsistencies"
            );
        }
        Ok(report)
    }

    fn active_mappings(&self, actor: &Principal) -> IdentityResult<Vec<DealerMapping>> {
        authorize(actor, Action::ViewMappings)?;
        Ok(self.book.read().active_mappings())
    }

    fn unmapped_dealers(&self, actor: &Principal) -> IdentityResult<Vec<User>> {
        authorize(actor, Action::ViewMappings)?;
        Ok(self.book.read().unmapped_dealers())
    }

    fn asos_with_dealers(&self, actor: &Principal) -> IdentityResult<Vec<AsoDealers>> {
        authorize(actor, Action::ViewMappings)?;
        Ok(self.book.read().asos_with_dealers())
    }

    fn assigned_dealers(&self, actor: &Principal) -> IdentityResult<Vec<User>> {
        authorize(actor, Action::ViewAssignedDealers)?;
        self.book.read().dealers_of(&actor.id)
    }
}
