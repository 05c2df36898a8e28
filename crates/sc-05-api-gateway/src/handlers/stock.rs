//! `/stock` routes: dispatch lifecycle, sales, purchases and stock views.
//!
//! Each handler authorizes the caller's role first; the ledger then
//! re-checks the hierarchy edges between the parties it moves stock
//! between.

use super::users::summaries;
use crate::domain::{ApiError, ApiResult};
use crate::middleware::{ApiJson, ApiPath, ApiQuery, Caller};
use crate::router::AppState;
use axum::extract::State;
use axum::Json;
use sc_01_identity::{authorize, Action};
use sc_03_stock_ledger::{
    DispatchFilter, DispatchRequest, DispatchView, PurchaseRequest, SaleRequest, SaleView,
    StockDispatch,
};
use serde_json::{json, Value};
use shared_types::{DispatchId, ErrorKind, Role};
use steel_telemetry::{record_stock, StockMovement};

fn dispatch_view(caller: &Caller) -> DispatchView {
    if caller.principal.is(Role::Aso) {
        DispatchView::Aso(caller.id())
    } else {
        DispatchView::Dealer(caller.id())
    }
}

fn sale_view(caller: &Caller) -> SaleView {
    if caller.principal.is(Role::Barbender) {
        SaleView::Barbender(caller.id())
    } else {
        SaleView::Dealer(caller.id())
    }
}

fn ensure_party_to(caller: &Caller, dispatch: &StockDispatch) -> ApiResult<()> {
    let id = caller.id();
    if dispatch.aso_id == id || dispatch.dealer_id == id || caller.principal.is(Role::SuperAdmin) {
        Ok(())
    } else {
        Err(ApiError::new(
            ErrorKind::NotAuthorized,
            "Not authorized to view this dispatch",
        ))
    }
}

pub async fn assigned_dealers(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<Value>> {
    let dealers = state.identity.assigned_dealers(&caller.principal)?;
    Ok(Json(json!({ "dealers": summaries(dealers) })))
}

pub async fn dispatch(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(request): ApiJson<DispatchRequest>,
) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::DispatchStock)?;
    let dispatch = state.ledger.dispatch(caller.id(), request)?;
    record_stock(StockMovement::Dispatched, dispatch.quantity.as_kg());
    Ok(Json(json!({
        "success": true,
        "message": "Stock dispatched successfully",
        "dispatch": dispatch,
    })))
}

pub async fn get_dispatch(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<DispatchId>,
) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ViewProfile)?;
    let dispatch = state.ledger.get_dispatch(id)?;
    ensure_party_to(&caller, &dispatch)?;
    Ok(Json(json!({ "dispatch": dispatch })))
}

pub async fn cancel(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<DispatchId>,
) -> ApiResult<Json<Value>> {
    let existing = state.ledger.get_dispatch(id)?;
    authorize(
        &caller.principal,
        Action::CancelDispatch {
            dispatched_by: existing.aso_id,
        },
    )?;
    let dispatch = state.ledger.cancel_dispatch(caller.id(), id)?;
    Ok(Json(json!({
        "success": true,
        "message": "Dispatch cancelled",
        "dispatch": dispatch,
    })))
}

pub async fn receive(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<DispatchId>,
) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ReceiveStock)?;
    let outcome = state.ledger.receive(caller.id(), id)?;
    record_stock(StockMovement::Received, outcome.dispatch.quantity.as_kg());
    Ok(Json(json!({
        "success": true,
        "message": "Stock received successfully",
        "dispatch": outcome.dispatch,
        "newBalance": outcome.new_balance,
        "dailyStock": outcome.daily_stock,
    })))
}

pub async fn dispatches(
    State(state): State<AppState>,
    caller: Caller,
    ApiQuery(filter): ApiQuery<DispatchFilter>,
) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ViewDispatches)?;
    let history = state.ledger.dispatches(dispatch_view(&caller), filter);
    Ok(Json(json!(history)))
}

pub async fn summary(State(state): State<AppState>, caller: Caller) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ViewStockSummary)?;
    let days = state.ledger.received_summary(caller.id());
    Ok(Json(json!({ "summary": days })))
}

pub async fn daily(State(state): State<AppState>, caller: Caller) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ViewStockSummary)?;
    let report = state.ledger.daily_report(caller.id());
    Ok(Json(json!(report)))
}

pub async fn sell(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(request): ApiJson<SaleRequest>,
) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::SellStock)?;
    let outcome = state.ledger.sell(caller.id(), request)?;
    record_stock(StockMovement::Sold, outcome.sale.quantity.as_kg());
    Ok(Json(json!({
        "success": true,
        "message": "Sale recorded",
        "sale": outcome.sale,
        "dealerBalance": outcome.dealer_balance,
        "barbenderBalance": outcome.barbender_balance,
    })))
}

pub async fn sales(State(state): State<AppState>, caller: Caller) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ViewSales)?;
    let history = state.ledger.sales(sale_view(&caller));
    Ok(Json(json!(history)))
}

pub async fn record_purchase(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(request): ApiJson<PurchaseRequest>,
) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::RecordPurchase)?;
    let outcome = state.ledger.record_purchase(caller.id(), request)?;
    record_stock(StockMovement::Purchased, outcome.purchase.quantity.as_kg());
    Ok(Json(json!({
        "success": true,
        "message": "Purchase recorded",
        "purchase": outcome.purchase,
        "balances": outcome.balances,
    })))
}

pub async fn purchases(State(state): State<AppState>, caller: Caller) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ViewPurchases)?;
    let history = state.ledger.purchases_of(caller.id());
    Ok(Json(json!(history)))
}

/// The caller's own ledger entries, oldest first.
pub async fn ledger_history(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ViewProfile)?;
    Ok(Json(json!({
        "entries": state.ledger.ledger_history(caller.id()),
        "balances": state.ledger.balances(caller.id()),
    })))
}
