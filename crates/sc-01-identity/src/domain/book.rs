//! In-memory identity book: users, phone index and mapping edges.
//!
//! Every method here runs under the service's single write lock, so the
//! three-part mapping update (forward reference, membership set, audit
//! record) is applied in a fixed order and never observed half-done.
//! `reconcile` still exists to repair state restored from elsewhere.

use super::errors::{IdentityError, IdentityResult};
use super::mapping::{AsoDealers, DealerMapping, ReconcileReport};
use super::user::User;
use shared_types::{MappingId, PhoneNumber, Role, Timestamp, UserId, UserStatus};
use std::collections::{BTreeSet, HashMap};

/// Validated fields of a provisioning request.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub phone_no: PhoneNumber,
    pub country_code: String,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub created_by: Option<UserId>,
}

#[derive(Debug, Default)]
pub struct IdentityBook {
    users: HashMap<UserId, User>,
    by_phone: HashMap<PhoneNumber, UserId>,
    mappings: HashMap<MappingId, DealerMapping>,
    /// dealer -> its single active mapping record
    active_by_dealer: HashMap<UserId, MappingId>,
}

fn sorted<'a>(users: impl Iterator<Item = &'a User>) -> Vec<User> {
    let mut out: Vec<User> = users.cloned().collect();
    out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    out
}

impl IdentityBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    // =========================================================================
    // USERS
    // =========================================================================

    pub fn insert(&mut self, draft: UserDraft, now: Timestamp) -> IdentityResult<User> {
        if self.by_phone.contains_key(&draft.phone_no) {
            return Err(IdentityError::PhoneTaken(draft.phone_no));
        }
        let user = User {
            id: UserId::new(),
            phone_no: draft.phone_no,
            country_code: draft.country_code,
            name: draft.name,
            email: draft.email,
            role: draft.role,
            status: UserStatus::Pending,
            assigned_aso: None,
            mapped_dealers: BTreeSet::new(),
            created_by: draft.created_by,
            last_otp_validated: None,
            created_at: now,
            updated_at: now,
        };
        self.by_phone.insert(user.phone_no.clone(), user.id);
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn get(&self, id: &UserId) -> IdentityResult<&User> {
        self.users.get(id).ok_or(IdentityError::UserNotFound(*id))
    }

    fn get_mut(&mut self, id: &UserId) -> IdentityResult<&mut User> {
        self.users.get_mut(id).ok_or(IdentityError::UserNotFound(*id))
    }

    pub fn find_by_phone(&self, phone: &PhoneNumber) -> Option<&User> {
        self.by_phone.get(phone).and_then(|id| self.users.get(id))
    }

    /// First successful OTP login. Returns the user and whether it was PENDING.
    pub fn activate(&mut self, id: &UserId, now: Timestamp) -> IdentityResult<(User, bool)> {
        let user = self.get_mut(id)?;
        user.ensure_can_login()?;
        let was_pending = user.status == UserStatus::Pending;
        user.status = UserStatus::Active;
        user.last_otp_validated = Some(now);
        user.updated_at = now;
        Ok((user.clone(), was_pending))
    }

    /// Applies a status change. Deleting a dealer or ASO tears down its
    /// mapping edges so that no reference is left dangling.
    pub fn set_status(
        &mut self,
        id: &UserId,
        status: UserStatus,
        now: Timestamp,
    ) -> IdentityResult<User> {
        let user = self.get(id)?;
        super::user::validate_transition(user.status, status)?;
        let role = user.role;
        let dealers: Vec<UserId> = user.mapped_dealers.iter().copied().collect();

        if status == UserStatus::Deleted {
            match role {
                Role::Dealer => {
                    self.unmap_dealer(id, now)?;
                }
                Role::Aso => {
                    for dealer in dealers {
                        self.unmap_dealer(&dealer, now)?;
                    }
                }
                _ => {}
            }
        }

        let user = self.get_mut(id)?;
        user.status = if user.status == UserStatus::Blocked && status == UserStatus::Active {
            super::user::reinstated_status(user.last_otp_validated)
        } else {
            status
        };
        user.updated_at = now;
        Ok(user.clone())
    }

    pub fn barbenders_of(&self, dealer: &UserId) -> Vec<User> {
        sorted(self.users.values().filter(|u| {
            u.role == Role::Barbender
                && u.created_by == Some(*dealer)
                && u.status != UserStatus::Deleted
        }))
    }

    pub fn users_with_role(&self, role: Role) -> Vec<User> {
        sorted(
            self.users
                .values()
                .filter(|u| u.role == role && u.status != UserStatus::Deleted),
        )
    }

    // =========================================================================
    // MAPPINGS
    // =========================================================================

    fn live_with_role(&self, id: &UserId, role: Role) -> IdentityResult<&User> {
        let user = self.get(id)?;
        user.ensure_role(role)?;
        if user.status == UserStatus::Deleted {
            return Err(IdentityError::AccountDeleted);
        }
        Ok(user)
    }

    pub fn map_dealer(
        &mut self,
        admin: UserId,
        aso: UserId,
        dealer: UserId,
        now: Timestamp,
    ) -> IdentityResult<DealerMapping> {
        self.live_with_role(&aso, Role::Aso)?;
        let dealer_user = self.live_with_role(&dealer, Role::Dealer)?;
        if let Some(current) = dealer_user.assigned_aso {
            return Err(IdentityError::AlreadyMapped {
                dealer,
                aso: current,
            });
        }
        if let Some(existing) = self
            .active_by_dealer
            .get(&dealer)
            .and_then(|id| self.mappings.get(id))
        {
            return Err(IdentityError::AlreadyMapped {
                dealer,
                aso: existing.aso,
            });
        }

        // forward reference, then membership, then audit record
        let d = self.get_mut(&dealer)?;
        d.assigned_aso = Some(aso);
        d.updated_at = now;
        let a = self.get_mut(&aso)?;
        a.mapped_dealers.insert(dealer);
        a.updated_at = now;
        let mapping = DealerMapping {
            id: MappingId::new(),
            aso,
            dealer,
            created_by: admin,
            active: true,
            created_at: now,
            deactivated_at: None,
        };
        self.active_by_dealer.insert(dealer, mapping.id);
        self.mappings.insert(mapping.id, mapping.clone());
        Ok(mapping)
    }

    /// Symmetric teardown. Returns the deactivated record, or `None` when the
    /// dealer was not mapped.
    pub fn unmap_dealer(
        &mut self,
        dealer: &UserId,
        now: Timestamp,
    ) -> IdentityResult<Option<DealerMapping>> {
        let forward = {
            let d = self.get(dealer)?;
            d.ensure_role(Role::Dealer)?;
            d.assigned_aso
        };

        if let Ok(d) = self.get_mut(dealer) {
            d.assigned_aso = None;
            d.updated_at = now;
        }
        if let Some(aso) = forward {
            if let Some(a) = self.users.get_mut(&aso) {
                a.mapped_dealers.remove(dealer);
                a.updated_at = now;
            }
        }
        let record = self
            .active_by_dealer
            .remove(dealer)
            .and_then(|id| self.mappings.get_mut(&id))
            .map(|m| {
                m.active = false;
                m.deactivated_at = Some(now);
                m.clone()
            });
        if let Some(m) = &record {
            if forward != Some(m.aso) {
                if let Some(a) = self.users.get_mut(&m.aso) {
                    a.mapped_dealers.remove(dealer);
                }
            }
        }
        Ok(record)
    }

    pub fn active_mappings(&self) -> Vec<DealerMapping> {
        let mut out: Vec<DealerMapping> =
            self.mappings.values().filter(|m| m.active).cloned().collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        out
    }

    pub fn unmapped_dealers(&self) -> Vec<User> {
        sorted(self.users.values().filter(|u| {
            u.role == Role::Dealer && u.assigned_aso.is_none() && u.status != UserStatus::Deleted
        }))
    }

    pub fn asos_with_dealers(&self) -> Vec<AsoDealers> {
        self.users_with_role(Role::Aso)
            .into_iter()
            .map(|aso| AsoDealers {
                aso: aso.id,
                name: aso.name,
                dealers: aso.mapped_dealers,
            })
            .collect()
    }

    pub fn dealers_of(&self, aso: &UserId) -> IdentityResult<Vec<User>> {
        let aso = self.get(aso)?;
        aso.ensure_role(Role::Aso)?;
        Ok(sorted(
            aso.mapped_dealers.iter().filter_map(|id| self.users.get(id)),
        ))
    }

    // =========================================================================
    // REPAIR
    // =========================================================================

    fn is_live(&self, id: &UserId, role: Role) -> bool {
        self.users
            .get(id)
            .is_some_and(|u| u.role == role && u.status != UserStatus::Deleted)
    }

    /// Restores agreement between forward references, membership sets and
    /// active audit records. Audit records win over forward references.
    pub fn reconcile(&mut self, admin: UserId, now: Timestamp) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        // 1. Active records: drop dangling ones and keep the newest per dealer.
        let mut active: Vec<DealerMapping> =
            self.mappings.values().filter(|m| m.active).cloned().collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let mut winner: HashMap<UserId, MappingId> = HashMap::new();
        for m in active {
            let valid = self.is_live(&m.dealer, Role::Dealer) && self.is_live(&m.aso, Role::Aso);
            if valid && !winner.contains_key(&m.dealer) {
                winner.insert(m.dealer, m.id);
            } else if let Some(rec) = self.mappings.get_mut(&m.id) {
                rec.active = false;
                rec.deactivated_at = Some(now);
                report.mappings_deactivated += 1;
            }
        }

        // 2. Forward references follow the surviving records.
        let dealers: Vec<UserId> = self
            .users
            .values()
            .filter(|u| u.role == Role::Dealer)
            .map(|u| u.id)
            .collect();
        for dealer in dealers {
            let forward = self.users.get(&dealer).and_then(|u| u.assigned_aso);
            let recorded = winner
                .get(&dealer)
                .and_then(|id| self.mappings.get(id))
                .map(|m| m.aso);
            let desired = match recorded {
                Some(aso) => Some(aso),
                None => match forward {
                    Some(aso) if self.is_live(&aso, Role::Aso) && self.is_live(&dealer, Role::Dealer) => {
                        let mapping = DealerMapping {
                            id: MappingId::new(),
                            aso,
                            dealer,
                            created_by: admin,
                            active: true,
                            created_at: now,
                            deactivated_at: None,
                        };
                        winner.insert(dealer, mapping.id);
                        self.mappings.insert(mapping.id, mapping);
                        report.mappings_created += 1;
                        Some(aso)
                    }
                    _ => None,
                },
            };
            if forward != desired {
                if let Some(u) = self.users.get_mut(&dealer) {
                    u.assigned_aso = desired;
                    u.updated_at = now;
                }
                report.forward_refs_fixed += 1;
            }
        }
        self.active_by_dealer = winner;

        // 3. Membership sets are rebuilt from forward references.
        let mut expected: HashMap<UserId, BTreeSet<UserId>> = HashMap::new();
        for u in self.users.values() {
            if let (Role::Dealer, Some(aso)) = (u.role, u.assigned_aso) {
                expected.entry(aso).or_default().insert(u.id);
            }
        }
        for u in self.users.values_mut() {
            let want = expected.remove(&u.id).unwrap_or_default();
            let added = want.difference(&u.mapped_dealers).count();
            let removed = u.mapped_dealers.difference(&want).count();
            if added + removed > 0 {
                report.memberships_added += added;
                report.memberships_removed += removed;
                u.mapped_dealers = want;
                u.updated_at = now;
            }
        }

        report
    }

    #[cfg(test)]
    pub(crate) fn user_mut_for_test(&mut self, id: &UserId) -> &mut User {
        self.users.get_mut(id).expect("user")
    }

    #[cfg(test)]
    pub(crate) fn drop_mapping_records_for_test(&mut self) {
        self.mappings.clear();
        self.active_by_dealer.clear();
    }
}
