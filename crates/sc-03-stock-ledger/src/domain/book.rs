//! # Stock Book
//!
//! All ledger state in one place: balances, dispatches, sales, purchases,
//! daily rows and the catalog. The service keeps it behind a single mutex.
//!
//! Every mutating method follows the same shape: check every precondition,
//! build the ledger legs and the projected daily row, post the legs, then
//! store the records. The ledger post is the only step that can still fail
//! after validation, and it fails before anything else is written.

use super::daily::{DailyBook, DailyMovement};
use super::dispatch::{DispatchStatus, StockDispatch};
use super::errors::{LedgerError, LedgerResult};
use super::ledger::{AccountKey, Balances, EntryCause, IntegrityReport, Ledger, LedgerEntry, Posting};
use super::party::Party;
use super::product::ProductCatalog;
use super::requests::{
    clean_text, require_positive, DispatchFilter, DispatchHistory, DispatchRequest, DispatchView,
    PurchaseHistory, PurchaseOutcome, PurchaseRequest, ReceiveOutcome, ReceivedDay, SaleOutcome,
    SaleRequest, SaleView, SalesHistory,
};
use super::sale::{Purchase, Sale};
use shared_types::{
    date_of, sequential_day, DispatchId, Period, PurchaseId, Quantity, RewardId, Role, SaleId,
    Timestamp, UserId, ValidationError,
};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
pub struct StockBook {
    ledger: Ledger,
    dispatches: HashMap<DispatchId, StockDispatch>,
    sales: Vec<Sale>,
    purchases: Vec<Purchase>,
    daily: DailyBook,
    catalog: ProductCatalog,
}

impl StockBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut ProductCatalog {
        &mut self.catalog
    }

    pub fn balances_of(&self, user: UserId) -> Balances {
        self.ledger.balances_of(user)
    }

    // =========================================================================
    // DISPATCH LIFECYCLE
    // =========================================================================

    /// Records a PENDING dispatch. No balance moves until the dealer receives it.
    pub fn dispatch(
        &mut self,
        aso: &Party,
        dealer: &Party,
        req: DispatchRequest,
        now: Timestamp,
    ) -> LedgerResult<StockDispatch> {
        aso.ensure_role(Role::Aso)?;
        aso.ensure_active()?;
        dealer.ensure_role(Role::Dealer)?;
        dealer.ensure_active()?;
        if dealer.assigned_aso != Some(aso.id) {
            return Err(LedgerError::NotMapped {
                dealer: dealer.id,
                aso: aso.id,
            });
        }
        let quantity = require_positive(req.quantity)?;
        self.catalog.active(req.product_id)?;

        let dispatch = StockDispatch {
            id: DispatchId::new(),
            aso_id: aso.id,
            dealer_id: dealer.id,
            product_id: req.product_id,
            quantity,
            dispatched_at: now,
            day_number: sequential_day(now),
            status: DispatchStatus::Pending,
            received_at: None,
            cancelled_at: None,
            notes: clean_text(req.notes),
        };
        self.dispatches.insert(dispatch.id, dispatch.clone());
        Ok(dispatch)
    }

    pub fn dispatch_by_id(&self, id: DispatchId) -> LedgerResult<&StockDispatch> {
        self.dispatches.get(&id).ok_or(LedgerError::DispatchNotFound(id))
    }

    /// PENDING → RECEIVED, credits the dealer and updates today's row.
    pub fn receive(&mut self, dealer: &Party, id: DispatchId, now: Timestamp) -> LedgerResult<ReceiveOutcome> {
        dealer.ensure_role(Role::Dealer)?;
        dealer.ensure_active()?;
        let dispatch = self.dispatch_by_id(id)?;
        if dispatch.dealer_id != dealer.id {
            return Err(LedgerError::NotAuthorized {
                reason: "dispatch belongs to another dealer",
            });
        }
        dispatch.ensure_pending()?;
        let quantity = dispatch.quantity;

        let row = self
            .daily
            .project(dealer.id, now, DailyMovement::Received(quantity))?;
        self.ledger.post(
            &[Posting::credit(AccountKey::available(dealer.id), quantity)],
            EntryCause::Receipt { dispatch: id },
            now,
        )?;
        self.daily.store(row.clone());

        let dispatch = self
            .dispatches
            .get_mut(&id)
            .ok_or(LedgerError::DispatchNotFound(id))?;
        dispatch.mark_received(now)?;
        Ok(ReceiveOutcome {
            dispatch: dispatch.clone(),
            new_balance: self.ledger.balance(AccountKey::available(dealer.id)),
            daily_stock: row,
        })
    }

    /// PENDING → CANCELLED. Balances are untouched.
    /// PENDING → CANCELLED by the dispatching ASO or a super admin.
    pub fn cancel(&mut self, actor: &Party, id: DispatchId, now: Timestamp) -> LedgerResult<StockDispatch> {
        actor.ensure_active()?;
        let dispatch = self
            .dispatches
            .get_mut(&id)
            .ok_or(LedgerError::DispatchNotFound(id))?;
        let allowed = actor.role == Role::SuperAdmin
            || (actor.role == Role::Aso && dispatch.aso_id == actor.id);
        if !allowed {
            return Err(LedgerError::NotAuthorized {
                reason: "only the dispatching ASO or a super admin may cancel",
            });
        }
        dispatch.mark_cancelled(now)?;
        Ok(dispatch.clone())
    }

    /// Newest first.
    pub fn dispatches(&self, view: DispatchView, filter: DispatchFilter) -> DispatchHistory {
        let mut dispatches: Vec<StockDispatch> = self
            .dispatches
            .values()
            .filter(|d| match view {
                DispatchView::Dealer(id) => d.dealer_id == id,
                DispatchView::Aso(id) => d.aso_id == id,
            })
            .filter(|d| filter.status.map_or(true, |s| d.status == s))
            .cloned()
            .collect();
        dispatches.sort_by(|a, b| b.dispatched_at.cmp(&a.dispatched_at));
        let total_received = dispatches
            .iter()
            .filter(|d| d.status == DispatchStatus::Received)
            .map(|d| d.quantity)
            .sum();
        DispatchHistory {
            dispatches,
            total_received,
        }
    }

    /// Day-wise totals of what the dealer has received, newest day first.
    pub fn received_summary(&self, dealer: UserId) -> Vec<ReceivedDay> {
        let mut days: BTreeMap<chrono::NaiveDate, ReceivedDay> = BTreeMap::new();
        for d in self.dispatches.values() {
            let Some(received_at) = d.received_at else {
                continue;
            };
            if d.dealer_id != dealer {
                continue;
            }
            let date = date_of(received_at);
            let day = days.entry(date).or_insert_with(|| ReceivedDay {
                date,
                day_number: sequential_day(received_at),
                total_received: Quantity::ZERO,
                dispatch_count: 0,
            });
            day.total_received = day.total_received.saturating_add(d.quantity);
            day.dispatch_count += 1;
        }
        days.into_values().rev().collect()
    }

    // =========================================================================
    // SALES AND PURCHASES
    // =========================================================================

    /// Moves `quantity` from the dealer to one of its barbenders.
    pub fn sell(
        &mut self,
        dealer: &Party,
        barbender: &Party,
        req: SaleRequest,
        now: Timestamp,
    ) -> LedgerResult<SaleOutcome> {
        dealer.ensure_role(Role::Dealer)?;
        dealer.ensure_active()?;
        barbender.ensure_role(Role::Barbender)?;
        if barbender.owner_dealer != Some(dealer.id) {
            return Err(LedgerError::NotOwned {
                barbender: barbender.id,
                dealer: dealer.id,
            });
        }
        barbender.ensure_not_suspended()?;
        let quantity = require_positive(req.quantity)?;
        self.catalog.active(req.product_id)?;

        let available = self.ledger.balance(AccountKey::available(dealer.id));
        if quantity > available {
            return Err(LedgerError::InsufficientStock {
                available,
                requested: quantity,
            });
        }

        let row = self
            .daily
            .project(dealer.id, now, DailyMovement::Dispatched(quantity))?;
        let sale = Sale {
            id: SaleId::new(),
            dealer_id: dealer.id,
            barbender_id: barbender.id,
            product_id: req.product_id,
            quantity,
            sold_at: now,
            notes: clean_text(req.notes),
        };
        self.ledger.post(
            &[
                Posting::debit(AccountKey::available(dealer.id), quantity),
                Posting::credit(AccountKey::reward_eligible(dealer.id), quantity),
                Posting::credit(AccountKey::available(barbender.id), quantity),
                Posting::credit(AccountKey::reward_eligible(barbender.id), quantity),
            ],
            EntryCause::Sale { sale: sale.id },
            now,
        )?;
        self.daily.store(row);
        self.sales.push(sale.clone());

        Ok(SaleOutcome {
            sale,
            dealer_balance: self.ledger.balances_of(dealer.id),
            barbender_balance: self.ledger.balances_of(barbender.id),
        })
    }

    /// External purchase by a barbender; counts toward its rewards.
    pub fn record_purchase(
        &mut self,
        barbender: &Party,
        req: PurchaseRequest,
        now: Timestamp,
    ) -> LedgerResult<PurchaseOutcome> {
        barbender.ensure_role(Role::Barbender)?;
        barbender.ensure_active()?;
        let source_name = req.source_name.trim().to_string();
        if source_name.is_empty() {
            return Err(ValidationError::MissingField("sourceName").into());
        }
        let quantity = require_positive(req.quantity)?;
        if let Some(product) = req.product_id {
            self.catalog.get(product)?;
        }

        let purchase = Purchase {
            id: PurchaseId::new(),
            barbender_id: barbender.id,
            source_name,
            location: clean_text(req.location),
            product_id: req.product_id,
            quantity,
            purchased_at: now,
            notes: clean_text(req.notes),
        };
        self.ledger.post(
            &[
                Posting::credit(AccountKey::available(barbender.id), quantity),
                Posting::credit(AccountKey::reward_eligible(barbender.id), quantity),
            ],
            EntryCause::Purchase {
                purchase: purchase.id,
            },
            now,
        )?;
        self.purchases.push(purchase.clone());
        Ok(PurchaseOutcome {
            purchase,
            balances: self.ledger.balances_of(barbender.id),
        })
    }

    /// Newest first.
    pub fn sales(&self, view: SaleView) -> SalesHistory {
        let mut sales: Vec<Sale> = self
            .sales
            .iter()
            .filter(|s| match view {
                SaleView::Dealer(id) => s.dealer_id == id,
                SaleView::Barbender(id) => s.barbender_id == id,
            })
            .cloned()
            .collect();
        sales.sort_by(|a, b| b.sold_at.cmp(&a.sold_at));
        let total = sales.iter().map(|s| s.quantity).sum();
        SalesHistory { sales, total }
    }

    /// Newest first.
    pub fn purchases_of(&self, barbender: UserId) -> PurchaseHistory {
        let mut purchases: Vec<Purchase> = self
            .purchases
            .iter()
            .filter(|p| p.barbender_id == barbender)
            .cloned()
            .collect();
        purchases.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at));
        let total = purchases.iter().map(|p| p.quantity).sum();
        PurchaseHistory {
            purchases,
            total,
            reward_eligible: self.ledger.balance(AccountKey::reward_eligible(barbender)),
        }
    }

    /// Sum of sale quantities where `user` is the dealer (DEALER) or the
    /// barbender (BARBENDER), sold within `period`.
    pub fn sale_total(&self, user: UserId, role: Role, period: Period) -> Quantity {
        self.sales
            .iter()
            .filter(|s| period.contains(s.sold_at))
            .filter(|s| match role {
                Role::Dealer => s.dealer_id == user,
                Role::Barbender => s.barbender_id == user,
                Role::SuperAdmin | Role::Aso => false,
            })
            .map(|s| s.quantity)
            .sum()
    }

    // =========================================================================
    // REWARDS, DAILY ROWS, INTEGRITY
    // =========================================================================

    pub fn credit_reward(
        &mut self,
        user: UserId,
        quantity: Quantity,
        reward: RewardId,
        now: Timestamp,
    ) -> LedgerResult<Balances> {
        let quantity = require_positive(quantity)?;
        self.ledger.post(
            &[Posting::credit(AccountKey::reward_eligible(user), quantity)],
            EntryCause::RewardClaim { reward },
            now,
        )?;
        Ok(self.ledger.balances_of(user))
    }

    pub fn daily(&self) -> &DailyBook {
        &self.daily
    }

    pub fn ledger_history(&self, user: UserId) -> Vec<LedgerEntry> {
        self.ledger.history(user)
    }

    /// Replays the ledger and checks every dealer's latest daily closing
    /// against its available balance.
    pub fn verify_integrity(&self) -> IntegrityReport {
        let mut report = self.ledger.verify();
        let mut dealers: Vec<UserId> = self.dispatches.values().map(|d| d.dealer_id).collect();
        dealers.sort();
        dealers.dedup();
        for dealer in dealers {
            let account = AccountKey::available(dealer);
            if self.daily.latest_closing(dealer) != self.ledger.balance(account)
                && !report.mismatched.contains(&account)
            {
                report.mismatched.push(account);
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{NewProduct, ProductCategory, ProductUnit};
    use proptest::prelude::*;
    use shared_types::{ErrorKind, UserStatus, DAY_NUMBER_EPOCH_MS, HOUR_MS};

    const T0: Timestamp = DAY_NUMBER_EPOCH_MS + 10 * HOUR_MS;

    struct World {
        book: StockBook,
        aso: Party,
        dealer: Party,
        barbender: Party,
        product: shared_types::ProductId,
    }

    fn party(role: Role) -> Party {
        Party {
            id: UserId::new(),
            name: format!("{role}"),
            role,
            status: UserStatus::Active,
            assigned_aso: None,
            owner_dealer: None,
        }
    }

    fn world() -> World {
        let aso = party(Role::Aso);
        let mut dealer = party(Role::Dealer);
        dealer.assigned_aso = Some(aso.id);
        let mut barbender = party(Role::Barbender);
        barbender.owner_dealer = Some(dealer.id);

        let mut book = StockBook::new();
        let product = book
            .catalog_mut()
            .create(
                NewProduct {
                    product_code: "STL-T".into(),
                    product_name: "Test Rod".into(),
                    category: ProductCategory::SteelRod,
                    thickness_inch: 0.5,
                    grade: None,
                    length: None,
                    weight_per_unit: None,
                    unit: ProductUnit::Kg,
                    price_per_unit: 10.0,
                },
                UserId::new(),
                0,
            )
            .unwrap()
            .id;
        World {
            book,
            aso,
            dealer,
            barbender,
            product,
        }
    }

    impl World {
        fn dispatch(&mut self, kg: u64) -> DispatchId {
            self.book
                .dispatch(
                    &self.aso,
                    &self.dealer,
                    DispatchRequest {
                        dealer_id: self.dealer.id,
                        product_id: self.product,
                        quantity: Quantity::from_kg(kg),
                        notes: None,
                    },
                    T0,
                )
                .unwrap()
                .id
        }

        fn stock_dealer(&mut self, kg: u64) {
            let id = self.dispatch(kg);
            self.book.receive(&self.dealer, id, T0).unwrap();
        }

        fn sell(&mut self, kg: u64) -> LedgerResult<SaleOutcome> {
            self.book.sell(
                &self.dealer,
                &self.barbender,
                SaleRequest {
                    barbender_id: self.barbender.id,
                    product_id: self.product,
                    quantity: Quantity::from_kg(kg),
                    notes: None,
                },
                T0 + HOUR_MS,
            )
        }
    }

    #[test]
    fn test_dispatch_does_not_move_balance() {
        let mut w = world();
        w.dispatch(100);
        assert_eq!(w.book.balances_of(w.dealer.id), Balances::default());
    }

    #[test]
    fn test_dispatch_requires_mapping() {
        let mut w = world();
        w.dealer.assigned_aso = Some(UserId::new());
        let err = w
            .book
            .dispatch(
                &w.aso,
                &w.dealer,
                DispatchRequest {
                    dealer_id: w.dealer.id,
                    product_id: w.product,
                    quantity: Quantity::from_kg(1),
                    notes: None,
                },
                T0,
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotMapped { .. }));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut w = world();
        let err = w
            .book
            .dispatch(
                &w.aso,
                &w.dealer,
                DispatchRequest {
                    dealer_id: w.dealer.id,
                    product_id: w.product,
                    quantity: Quantity::ZERO,
                    notes: None,
                },
                T0,
            )
            .unwrap_err();
        assert_eq!(err.kind(), shared_types::ErrorKind::ValidationError);
    }

    #[test]
    fn test_receive_credits_once() {
        let mut w = world();
        let id = w.dispatch(100);
        let outcome = w.book.receive(&w.dealer, id, T0).unwrap();
        assert_eq!(outcome.new_balance, Quantity::from_kg(100));
        assert_eq!(outcome.daily_stock.total_received, Quantity::from_kg(100));

        let err = w.book.receive(&w.dealer, id, T0).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::AlreadyProcessed {
                status: DispatchStatus::Received,
                ..
            }
        ));
        assert_eq!(
            w.book.balances_of(w.dealer.id).available_qty,
            Quantity::from_kg(100)
        );
    }

    #[test]
    fn test_receive_by_other_dealer_refused() {
        let mut w = world();
        let id = w.dispatch(10);
        let mut other = party(Role::Dealer);
        other.assigned_aso = Some(w.aso.id);
        let err = w.book.receive(&other, id, T0).unwrap_err();
        assert!(matches!(err, LedgerError::NotAuthorized { .. }));
    }

    #[test]
    fn test_cancelled_dispatch_cannot_be_received() {
        let mut w = world();
        let id = w.dispatch(10);
        w.book.cancel(&w.aso, id, T0).unwrap();
        assert!(w.book.receive(&w.dealer, id, T0).is_err());
        assert!(w.book.balances_of(w.dealer.id).available_qty.is_zero());
    }

    #[test]
    fn test_cancel_limited_to_dispatching_aso_and_admin() {
        let mut w = world();
        let id = w.dispatch(10);

        let other_aso = party(Role::Aso);
        for actor in [&other_aso, &w.dealer, &w.barbender] {
            let err = w.book.cancel(actor, id, T0).unwrap_err();
            assert!(matches!(err, LedgerError::NotAuthorized { .. }));
        }
        let mut blocked = w.aso.clone();
        blocked.status = UserStatus::Blocked;
        assert_eq!(
            w.book.cancel(&blocked, id, T0).unwrap_err().kind(),
            ErrorKind::AccountBlocked
        );
        assert_eq!(
            w.book.dispatch_by_id(id).unwrap().status,
            DispatchStatus::Pending
        );

        let admin = party(Role::SuperAdmin);
        let cancelled = w.book.cancel(&admin, id, T0).unwrap();
        assert_eq!(cancelled.status, DispatchStatus::Cancelled);
    }

    #[test]
    fn test_sell_moves_exact_quantity() {
        let mut w = world();
        w.stock_dealer(100);
        let outcome = w.sell(30).unwrap();

        assert_eq!(outcome.dealer_balance.available_qty, Quantity::from_kg(70));
        assert_eq!(outcome.dealer_balance.reward_eligible_qty, Quantity::from_kg(30));
        assert_eq!(outcome.barbender_balance.available_qty, Quantity::from_kg(30));
        assert_eq!(outcome.barbender_balance.reward_eligible_qty, Quantity::from_kg(30));
        assert!(w.book.verify_integrity().is_consistent());
    }

    #[test]
    fn test_oversell_leaves_balances_unchanged() {
        let mut w = world();
        w.stock_dealer(20);
        let err = w.sell(21).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                available: Quantity::from_kg(20),
                requested: Quantity::from_kg(21),
            }
        );
        assert_eq!(w.book.balances_of(w.dealer.id).available_qty, Quantity::from_kg(20));
        assert_eq!(w.book.balances_of(w.barbender.id), Balances::default());
        assert!(w.book.sales(SaleView::Dealer(w.dealer.id)).sales.is_empty());
    }

    #[test]
    fn test_sell_to_foreign_barbender_refused() {
        let mut w = world();
        w.stock_dealer(20);
        w.barbender.owner_dealer = Some(UserId::new());
        assert!(matches!(w.sell(5).unwrap_err(), LedgerError::NotOwned { .. }));
    }

    #[test]
    fn test_sell_to_blocked_barbender_refused() {
        let mut w = world();
        w.stock_dealer(20);
        w.barbender.status = UserStatus::Blocked;
        assert_eq!(
            w.sell(5).unwrap_err().kind(),
            shared_types::ErrorKind::AccountBlocked
        );
    }

    #[test]
    fn test_purchase_credits_both_balances() {
        let mut w = world();
        let outcome = w
            .book
            .record_purchase(
                &w.barbender,
                PurchaseRequest {
                    source_name: " Local Yard ".into(),
                    location: None,
                    product_id: None,
                    quantity: Quantity::from_kg(12),
                    notes: None,
                },
                T0,
            )
            .unwrap();
        assert_eq!(outcome.purchase.source_name, "Local Yard");
        assert_eq!(outcome.balances.available_qty, Quantity::from_kg(12));
        assert_eq!(outcome.balances.reward_eligible_qty, Quantity::from_kg(12));
        assert_eq!(w.book.purchases_of(w.barbender.id).total, Quantity::from_kg(12));
    }

    #[test]
    fn test_sale_total_by_role_and_period() {
        let mut w = world();
        w.stock_dealer(500);
        w.sell(250).unwrap();
        let month = Period::month_of(T0);

        assert_eq!(w.book.sale_total(w.dealer.id, Role::Dealer, month), Quantity::from_kg(250));
        assert_eq!(w.book.sale_total(w.barbender.id, Role::Barbender, month), Quantity::from_kg(250));
        assert_eq!(w.book.sale_total(w.dealer.id, Role::Barbender, month), Quantity::ZERO);

        let next = Period::new(month.end + 1, month.end + 10).unwrap();
        assert_eq!(w.book.sale_total(w.dealer.id, Role::Dealer, next), Quantity::ZERO);
    }

    #[test]
    fn test_received_summary_groups_by_day() {
        let mut w = world();
        w.stock_dealer(10);
        w.stock_dealer(15);
        let days = w.book.received_summary(w.dealer.id);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].total_received, Quantity::from_kg(25));
        assert_eq!(days[0].dispatch_count, 2);
        assert_eq!(days[0].day_number, 1);
    }

    proptest! {
        #[test]
        fn prop_daily_closing_tracks_ledger(ops in prop::collection::vec((any::<bool>(), 1u64..200), 1..40)) {
            let mut w = world();
            for (i, (receive, kg)) in ops.into_iter().enumerate() {
                let at = T0 + (i as u64) * 7 * HOUR_MS;
                if receive {
                    let id = w.dispatch(kg);
                    w.book.receive(&w.dealer, id, at).unwrap();
                } else {
                    let _ = w.book.sell(
                        &w.dealer,
                        &w.barbender,
                        SaleRequest {
                            barbender_id: w.barbender.id,
                            product_id: w.product,
                            quantity: Quantity::from_kg(kg),
                            notes: None,
                        },
                        at,
                    );
                }
                prop_assert_eq!(
                    w.book.daily().latest_closing(w.dealer.id),
                    w.book.balances_of(w.dealer.id).available_qty
                );
            }
            prop_assert!(w.book.verify_integrity().is_consistent());
        }
    }
}
