//! Reward Service - summaries, claims and history

use crate::adapters::MemoryRewardStore;
use crate::domain::{
    Beneficiary, ClaimOutcome, LoyaltyTier, Reward, RewardCalc, RewardConfig, RewardError,
    RewardResult, RewardStatus, RewardSummary,
};
use crate::ports::{BeneficiaryDirectory, RewardAccounts, RewardApi, RewardStore};
use shared_types::{Period, RewardId, TimeSource, UserId, UserStatus};
use std::sync::Arc;

pub struct RewardService {
    config: RewardConfig,
    directory: Arc<dyn BeneficiaryDirectory>,
    accounts: Arc<dyn RewardAccounts>,
    store: Arc<dyn RewardStore>,
    clock: Arc<dyn TimeSource>,
}

impl RewardService {
    /// Service backed by the in-memory claim store.
    pub fn new(
        config: RewardConfig,
        directory: Arc<dyn BeneficiaryDirectory>,
        accounts: Arc<dyn RewardAccounts>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self::with_store(
            config,
            directory,
            accounts,
            Arc::new(MemoryRewardStore::new()),
            clock,
        )
    }

    pub fn with_store(
        config: RewardConfig,
        directory: Arc<dyn BeneficiaryDirectory>,
        accounts: Arc<dyn RewardAccounts>,
        store: Arc<dyn RewardStore>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            config,
            directory,
            accounts,
            store,
            clock,
        }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    fn beneficiary(&self, user: UserId) -> RewardResult<Beneficiary> {
        let b = self
            .directory
            .beneficiary(user)
            .ok_or(RewardError::UserNotFound(user))?;
        if b.status == UserStatus::Deleted {
            return Err(RewardError::UserNotFound(user));
        }
        if !b.role.earns_rewards() {
            return Err(RewardError::NotEligible(b.role));
        }
        Ok(b)
    }

    fn period_or_current(&self, period: Option<Period>) -> Period {
        period.unwrap_or_else(|| Period::month_of(self.clock.now()))
    }
}

impl RewardApi for RewardService {
    fn summary(&self, user: UserId, period: Option<Period>) -> RewardResult<RewardSummary> {
        let b = self.beneficiary(user)?;
        let period = self.period_or_current(period);
        let total = self.accounts.sale_total(b.id, b.role, period);
        let claimed = self.store.claimed_eligible(b.id, period);
        let current_balance = self.accounts.reward_eligible_balance(b.id);
        Ok(RewardSummary {
            period,
            calc: RewardCalc::compute(total, claimed, &self.config),
            current_balance,
            tier: LoyaltyTier::for_balance(current_balance),
        })
    }

    fn claim(&self, user: UserId, period: Option<Period>) -> RewardResult<ClaimOutcome> {
        let b = self.beneficiary(user)?;
        if b.status != UserStatus::Active {
            return Err(RewardError::AccountInactive(b.status));
        }
        let period = self.period_or_current(period);

        let mut new_balance = None;
        let reward = self.store.claim_with(b.id, period, &mut |already_claimed| {
            let total = self.accounts.sale_total(b.id, b.role, period);
            let calc = RewardCalc::compute(total, already_claimed, &self.config);
            if calc.claimable_reward_kg.is_zero() {
                return Err(RewardError::NothingToClaim);
            }
            let now = self.clock.now();
            let reward = Reward {
                id: RewardId::new(),
                user_id: b.id,
                user_role: b.role,
                user_name: b.name.clone(),
                period,
                total_kg: calc.total_kg,
                eligible_kg: calc.eligible_kg,
                newly_covered_kg: calc.claimable_eligible_kg,
                reward_kg: calc.claimable_reward_kg,
                status: RewardStatus::Claimed,
                claimed_at: Some(now),
                created_at: now,
            };
            new_balance = Some(self.accounts.credit_reward(b.id, reward.reward_kg, reward.id)?);
            Ok(reward)
        });

        let reward = match reward {
            Ok(reward) => reward,
            Err(err) => {
                tracing::info!(subsystem = "rewards", user_id = %user, error = %err, "Reward claim refused");
                return Err(err);
            }
        };
        let new_balance = new_balance.unwrap_or_else(|| self.accounts.reward_eligible_balance(b.id));
        tracing::info!(
            subsystem = "rewards",
            user_id = %b.id,
            role = %b.role,
            reward_id = %reward.id,
            reward = %reward.reward_kg,
            covered = %reward.newly_covered_kg,
            "Reward claimed"
        );
        Ok(ClaimOutcome {
            message: format!("Reward of {}kg claimed!", reward.reward_kg.whole_kg()),
            reward_kg: reward.reward_kg,
            new_balance,
            reward,
        })
    }

    fn history(&self, user: UserId) -> RewardResult<Vec<Reward>> {
        let b = self.beneficiary(user)?;
        Ok(self.store.history(b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{MockTimeSource, Quantity, Role, DAY_MS, DAY_NUMBER_EPOCH_MS};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Sales and balances kept in plain maps.
    #[derive(Default)]
    struct Accounts {
        sales: Mutex<Vec<(UserId, u64, Quantity)>>,
        balances: Mutex<HashMap<UserId, Quantity>>,
    }

    impl Accounts {
        fn record_sale(&self, user: UserId, at: u64, kg: u64) {
            self.sales.lock().unwrap().push((user, at, Quantity::from_kg(kg)));
        }
    }

    impl RewardAccounts for Accounts {
        fn sale_total(&self, user: UserId, _role: Role, period: Period) -> Quantity {
            self.sales
                .lock()
                .unwrap()
                .iter()
                .filter(|(u, at, _)| *u == user && period.contains(*at))
                .map(|(_, _, q)| *q)
                .sum()
        }

        fn reward_eligible_balance(&self, user: UserId) -> Quantity {
            self.balances.lock().unwrap().get(&user).copied().unwrap_or_default()
        }

        fn credit_reward(&self, user: UserId, quantity: Quantity, _reward: RewardId) -> RewardResult<Quantity> {
            let mut balances = self.balances.lock().unwrap();
            let entry = balances.entry(user).or_default();
            *entry = entry.saturating_add(quantity);
            Ok(*entry)
        }
    }

    #[derive(Default)]
    struct Directory(Mutex<HashMap<UserId, Beneficiary>>);

    impl Directory {
        fn add(&self, role: Role, status: UserStatus) -> UserId {
            let id = UserId::new();
            self.0.lock().unwrap().insert(
                id,
                Beneficiary {
                    id,
                    name: "Someone".into(),
                    role,
                    status,
                },
            );
            id
        }
    }

    impl BeneficiaryDirectory for Directory {
        fn beneficiary(&self, id: UserId) -> Option<Beneficiary> {
            self.0.lock().unwrap().get(&id).cloned()
        }
    }

    const MID_JAN: u64 = DAY_NUMBER_EPOCH_MS + 14 * DAY_MS;

    fn setup() -> (RewardService, Arc<Accounts>, Arc<Directory>, Arc<MockTimeSource>) {
        let accounts = Arc::new(Accounts::default());
        let directory = Arc::new(Directory::default());
        let clock = Arc::new(MockTimeSource::new(MID_JAN));
        let svc = RewardService::new(
            RewardConfig::default(),
            directory.clone(),
            accounts.clone(),
            clock.clone(),
        );
        (svc, accounts, directory, clock)
    }

    #[test]
    fn test_summary_for_current_month() {
        let (svc, accounts, directory, _) = setup();
        let dealer = directory.add(Role::Dealer, UserStatus::Active);
        accounts.record_sale(dealer, MID_JAN, 250);

        let s = svc.summary(dealer, None).unwrap();
        assert_eq!(s.period, Period::month(2026, 1).unwrap());
        assert_eq!(s.calc.eligible_kg, Quantity::from_kg(200));
        assert_eq!(s.calc.reward_kg, Quantity::from_kg(10));
        assert_eq!(s.tier, LoyaltyTier::Bronze);
    }

    #[test]
    fn test_claim_then_nothing_left() {
        let (svc, accounts, directory, _) = setup();
        let dealer = directory.add(Role::Dealer, UserStatus::Active);
        accounts.record_sale(dealer, MID_JAN, 250);

        let outcome = svc.claim(dealer, None).unwrap();
        assert_eq!(outcome.reward_kg, Quantity::from_kg(10));
        assert_eq!(outcome.new_balance, Quantity::from_kg(10));
        assert_eq!(outcome.message, "Reward of 10kg claimed!");

        assert_eq!(svc.claim(dealer, None).unwrap_err(), RewardError::NothingToClaim);
    }

    #[test]
    fn test_new_sales_make_new_claim() {
        let (svc, accounts, directory, clock) = setup();
        let barbender = directory.add(Role::Barbender, UserStatus::Active);
        accounts.record_sale(barbender, MID_JAN, 250);
        svc.claim(barbender, None).unwrap();

        clock.advance(DAY_MS);
        accounts.record_sale(barbender, MID_JAN + DAY_MS, 100);
        let second = svc.claim(barbender, None).unwrap();
        assert_eq!(second.reward_kg, Quantity::from_kg(5));
        assert_eq!(second.reward.newly_covered_kg, Quantity::from_kg(100));
        assert_eq!(svc.history(barbender).unwrap().len(), 2);
    }

    #[test]
    fn test_below_threshold_nothing_to_claim() {
        let (svc, accounts, directory, _) = setup();
        let dealer = directory.add(Role::Dealer, UserStatus::Active);
        accounts.record_sale(dealer, MID_JAN, 99);
        assert!(svc.summary(dealer, None).unwrap().calc.reward_kg.is_zero());
        assert_eq!(svc.claim(dealer, None).unwrap_err().kind(), shared_types::ErrorKind::NothingToClaim);
        assert!(svc.history(dealer).unwrap().is_empty());
    }

    #[test]
    fn test_staff_roles_not_eligible() {
        let (svc, _, directory, _) = setup();
        let aso = directory.add(Role::Aso, UserStatus::Active);
        assert_eq!(
            svc.summary(aso, None).unwrap_err().kind(),
            shared_types::ErrorKind::NotAuthorized
        );
    }

    #[test]
    fn test_blocked_user_cannot_claim() {
        let (svc, accounts, directory, _) = setup();
        let dealer = directory.add(Role::Dealer, UserStatus::Blocked);
        accounts.record_sale(dealer, MID_JAN, 500);
        assert_eq!(
            svc.claim(dealer, None).unwrap_err().kind(),
            shared_types::ErrorKind::AccountBlocked
        );
    }

    #[test]
    fn test_previous_month_claimed_separately() {
        let (svc, accounts, directory, clock) = setup();
        let dealer = directory.add(Role::Dealer, UserStatus::Active);
        accounts.record_sale(dealer, MID_JAN, 300);
        clock.advance(31 * DAY_MS);
        accounts.record_sale(dealer, MID_JAN + 31 * DAY_MS, 100);

        let january = Period::month(2026, 1).unwrap();
        assert_eq!(svc.claim(dealer, Some(january)).unwrap().reward_kg, Quantity::from_kg(15));
        assert_eq!(svc.claim(dealer, None).unwrap().reward_kg, Quantity::from_kg(5));
    }
}
