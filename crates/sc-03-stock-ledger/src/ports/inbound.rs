//! # Inbound Port - StockLedgerApi
//!
//! Callers are identified by id; route-level capability checks happen
//! before these are invoked. The ledger still re-checks the live role,
//! status and hierarchy edges of every party it moves stock between.

use crate::domain::{
    Balances, DailyReport, DispatchFilter, DispatchHistory, DispatchRequest, DispatchView,
    IntegrityReport, LedgerEntry, LedgerResult, NewProduct, Product, ProductFilter, ProductUpdate,
    PurchaseHistory, PurchaseOutcome, PurchaseRequest, ReceiveOutcome, ReceivedDay, SaleOutcome,
    SaleRequest, SaleView, SalesHistory, SeedReport, StockDispatch,
};
use shared_types::{DispatchId, Period, ProductId, Quantity, RewardId, Role, UserId};

pub trait StockLedgerApi: Send + Sync {
    // --- dispatch lifecycle ---

    fn dispatch(&self, aso: UserId, request: DispatchRequest) -> LedgerResult<StockDispatch>;

    fn receive(&self, dealer: UserId, dispatch: DispatchId) -> LedgerResult<ReceiveOutcome>;

    /// Only the dispatching ASO or a super admin may cancel.
    fn cancel_dispatch(&self, actor: UserId, dispatch: DispatchId) -> LedgerResult<StockDispatch>;

    fn get_dispatch(&self, dispatch: DispatchId) -> LedgerResult<StockDispatch>;

    fn dispatches(&self, view: DispatchView, filter: DispatchFilter) -> DispatchHistory;

    fn received_summary(&self, dealer: UserId) -> Vec<ReceivedDay>;

    fn daily_report(&self, dealer: UserId) -> DailyReport;

    // --- sales and purchases ---

    fn sell(&self, dealer: UserId, request: SaleRequest) -> LedgerResult<SaleOutcome>;

    fn sales(&self, view: SaleView) -> SalesHistory;

    fn record_purchase(&self, barbender: UserId, request: PurchaseRequest) -> LedgerResult<PurchaseOutcome>;

    fn purchases_of(&self, barbender: UserId) -> PurchaseHistory;

    // --- balances ---

    fn balances(&self, user: UserId) -> Balances;

    fn ledger_history(&self, user: UserId) -> Vec<LedgerEntry>;

    /// Sale volume credited to `user` in its `role` within `period`.
    fn sale_total(&self, user: UserId, role: Role, period: Period) -> Quantity;

    /// Adds a claimed reward to the user's reward-eligible balance.
    fn credit_reward(&self, user: UserId, quantity: Quantity, reward: RewardId) -> LedgerResult<Balances>;

    fn verify_integrity(&self) -> IntegrityReport;

    // --- product catalog ---

    fn create_product(&self, admin: UserId, request: NewProduct) -> LedgerResult<Product>;

    fn list_products(&self, filter: ProductFilter) -> Vec<Product>;

    fn get_product(&self, id: ProductId) -> LedgerResult<Product>;

    fn update_product(&self, id: ProductId, patch: ProductUpdate) -> LedgerResult<Product>;

    fn deactivate_product(&self, id: ProductId) -> LedgerResult<Product>;

    fn seed_sample_products(&self, admin: UserId) -> LedgerResult<SeedReport>;
}
