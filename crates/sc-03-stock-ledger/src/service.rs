//! Stock Ledger Service - the single writer of every balance

use crate::domain::{
    Balances, DailyReport, DispatchFilter, DispatchHistory, DispatchRequest, DispatchView,
    IntegrityReport, LedgerEntry, LedgerError, LedgerResult, NewProduct, Party, Product,
    ProductFilter, ProductUpdate, PurchaseHistory, PurchaseOutcome, PurchaseRequest,
    ReceiveOutcome, ReceivedDay, SaleOutcome, SaleRequest, SaleView, SalesHistory, SeedReport,
    StockBook, StockDispatch,
};
use crate::ports::{PartyDirectory, StockLedgerApi};
use parking_lot::Mutex;
use shared_types::{DispatchId, Period, ProductId, Quantity, RewardId, Role, TimeSource, UserId};
use std::sync::Arc;

pub struct StockLedgerService {
    book: Mutex<StockBook>,
    parties: Arc<dyn PartyDirectory>,
    clock: Arc<dyn TimeSource>,
}

impl StockLedgerService {
    pub fn new(parties: Arc<dyn PartyDirectory>, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            book: Mutex::new(StockBook::new()),
            parties,
            clock,
        }
    }

    fn party(&self, id: UserId) -> LedgerResult<Party> {
        self.parties.party(id).ok_or(LedgerError::PartyNotFound(id))
    }
}

impl StockLedgerApi for StockLedgerService {
    fn dispatch(&self, aso: UserId, request: DispatchRequest) -> LedgerResult<StockDispatch> {
        let aso = self.party(aso)?;
        let dealer = self.party(request.dealer_id)?;
        let dispatch = self
            .book
            .lock()
            .dispatch(&aso, &dealer, request, self.clock.now())?;
        tracing::info!(
            subsystem = "stock-ledger",
            dispatch_id = %dispatch.id,
            aso = %dispatch.aso_id,
            dealer = %dispatch.dealer_id,
            quantity = %dispatch.quantity,
            day = dispatch.day_number,
            "Stock dispatched"
        );
        Ok(dispatch)
    }

    fn receive(&self, dealer: UserId, dispatch: DispatchId) -> LedgerResult<ReceiveOutcome> {
        let dealer = self.party(dealer)?;
        let outcome = self.book.lock().receive(&dealer, dispatch, self.clock.now());
        match &outcome {
            Ok(o) => tracing::info!(
                subsystem = "stock-ledger",
                dispatch_id = %dispatch,
                dealer = %dealer.id,
                quantity = %o.dispatch.quantity,
                balance = %o.new_balance,
                "Stock received"
            ),
            Err(err) => tracing::warn!(
                subsystem = "stock-ledger",
                dispatch_id = %dispatch,
                dealer = %dealer.id,
                error = %err,
                "Receive rejected"
            ),
        }
        outcome
    }

    fn cancel_dispatch(&self, actor: UserId, dispatch: DispatchId) -> LedgerResult<StockDispatch> {
        let actor = self.party(actor)?;
        let cancelled = self
            .book
            .lock()
            .cancel(&actor, dispatch, self.clock.now())?;
        tracing::info!(
            subsystem = "stock-ledger",
            dispatch_id = %dispatch,
            actor = %actor.id,
            "Dispatch cancelled"
        );
        Ok(cancelled)
    }

    fn get_dispatch(&self, dispatch: DispatchId) -> LedgerResult<StockDispatch> {
        self.book.lock().dispatch_by_id(dispatch).cloned()
    }

    fn dispatches(&self, view: DispatchView, filter: DispatchFilter) -> DispatchHistory {
        self.book.lock().dispatches(view, filter)
    }

    fn received_summary(&self, dealer: UserId) -> Vec<ReceivedDay> {
        self.book.lock().received_summary(dealer)
    }

    fn daily_report(&self, dealer: UserId) -> DailyReport {
        let book = self.book.lock();
        DailyReport {
            daily_stock: book.daily().today(dealer, self.clock.now()),
            history: book.daily().history(dealer),
            current_balance: book.balances_of(dealer).available_qty,
        }
    }

    fn sell(&self, dealer: UserId, request: SaleRequest) -> LedgerResult<SaleOutcome> {
        let dealer = self.party(dealer)?;
        let barbender = self.party(request.barbender_id)?;
        let outcome = self
            .book
            .lock()
            .sell(&dealer, &barbender, request, self.clock.now());
        match &outcome {
            Ok(o) => tracing::info!(
                subsystem = "stock-ledger",
                sale_id = %o.sale.id,
                dealer = %dealer.id,
                barbender = %barbender.id,
                quantity = %o.sale.quantity,
                "Stock sold"
            ),
            Err(err) => tracing::warn!(
                subsystem = "stock-ledger",
                dealer = %dealer.id,
                barbender = %barbender.id,
                error = %err,
                "Sale rejected"
            ),
        }
        outcome
    }

    fn sales(&self, view: SaleView) -> SalesHistory {
        self.book.lock().sales(view)
    }

    fn record_purchase(&self, barbender: UserId, request: PurchaseRequest) -> LedgerResult<PurchaseOutcome> {
        let barbender = self.party(barbender)?;
        let outcome = self
            .book
            .lock()
            .record_purchase(&barbender, request, self.clock.now())?;
        tracing::info!(
            subsystem = "stock-ledger",
            purchase_id = %outcome.purchase.id,
            barbender = %barbender.id,
            quantity = %outcome.purchase.quantity,
            "External purchase recorded"
        );
        Ok(outcome)
    }

    fn purchases_of(&self, barbender: UserId) -> PurchaseHistory {
        self.book.lock().purchases_of(barbender)
    }

    fn balances(&self, user: UserId) -> Balances {
        self.book.lock().balances_of(user)
    }

    fn ledger_history(&self, user: UserId) -> Vec<LedgerEntry> {
        self.book.lock().ledger_history(user)
    }

    fn sale_total(&self, user: UserId, role: Role, period: Period) -> Quantity {
        self.book.lock().sale_total(user, role, period)
    }

    fn credit_reward(&self, user: UserId, quantity: Quantity, reward: RewardId) -> LedgerResult<Balances> {
        let balances = self
            .book
            .lock()
            .credit_reward(user, quantity, reward, self.clock.now())?;
        tracing::info!(
            subsystem = "stock-ledger",
            user_id = %user,
            reward_id = %reward,
            quantity = %quantity,
            "Reward credited"
        );
        Ok(balances)
    }

    fn verify_integrity(&self) -> IntegrityReport {
        let report = self.book.lock().verify_integrity();
        if !report.is_consistent() {
            tracing::error!(
                subsystem = "stock-ledger",
                mismatched = report.mismatched.len(),
                "Ledger replay disagrees with cached balances"
            );
        }
        report
    }

    fn create_product(&self, admin: UserId, request: NewProduct) -> LedgerResult<Product> {
        let product = self
            .book
            .lock()
            .catalog_mut()
            .create(request, admin, self.clock.now())?;
        tracing::info!(
            subsystem = "stock-ledger",
            product_id = %product.id,
            code = %product.product_code,
            "Product created"
        );
        Ok(product)
    }

    fn list_products(&self, filter: ProductFilter) -> Vec<Product> {
        self.book.lock().catalog().list(filter)
    }

    fn get_product(&self, id: ProductId) -> LedgerResult<Product> {
        self.book.lock().catalog().get(id).cloned()
    }

    fn update_product(&self, id: ProductId, patch: ProductUpdate) -> LedgerResult<Product> {
        self.book
            .lock()
            .catalog_mut()
            .update(id, patch, self.clock.now())
    }

    fn deactivate_product(&self, id: ProductId) -> LedgerResult<Product> {
        let product = self
            .book
            .lock()
            .catalog_mut()
            .deactivate(id, self.clock.now())?;
        tracing::info!(subsystem = "stock-ledger", product_id = %id, "Product deactivated");
        Ok(product)
    }

    fn seed_sample_products(&self, admin: UserId) -> LedgerResult<SeedReport> {
        let report = self
            .book
            .lock()
            .catalog_mut()
            .seed_samples(admin, self.clock.now())?;
        tracing::info!(
            subsystem = "stock-ledger",
            created = report.created.len(),
            skipped = report.skipped.len(),
            "Sample products seeded"
        );
        Ok(report)
    }
}
