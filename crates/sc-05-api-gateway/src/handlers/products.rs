//! `/products` routes: the catalog. Any active user reads, Super Admin writes.

use crate::domain::ApiResult;
use crate::middleware::{ApiJson, ApiPath, ApiQuery, Caller};
use crate::router::AppState;
use axum::extract::State;
use axum::Json;
use sc_01_identity::{authorize, Action};
use sc_03_stock_ledger::{NewProduct, ProductFilter, ProductUpdate};
use serde_json::{json, Value};
use shared_types::ProductId;

pub async fn list(
    State(state): State<AppState>,
    caller: Caller,
    ApiQuery(filter): ApiQuery<ProductFilter>,
) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ViewProducts)?;
    Ok(Json(json!({ "products": state.ledger.list_products(filter) })))
}

pub async fn get_one(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<ProductId>,
) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ViewProducts)?;
    let product = state.ledger.get_product(id)?;
    Ok(Json(json!({ "product": product })))
}

pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(request): ApiJson<NewProduct>,
) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ManageProducts)?;
    let product = state.ledger.create_product(caller.id(), request)?;
    Ok(Json(json!({
        "success": true,
        "message": "Product created",
        "product": product,
    })))
}

pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(patch): ApiJson<ProductUpdate>,
) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ManageProducts)?;
    let product = state.ledger.update_product(id, patch)?;
    Ok(Json(json!({
        "success": true,
        "message": "Product updated",
        "product": product,
    })))
}

/// Soft delete: the product stays referenced by past dispatches.
pub async fn deactivate(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<ProductId>,
) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ManageProducts)?;
    let product = state.ledger.deactivate_product(id)?;
    Ok(Json(json!({
        "success": true,
        "message": "Product deactivated",
        "product": product,
    })))
}

pub async fn seed_sample(State(state): State<AppState>, caller: Caller) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ManageProducts)?;
    let report = state.ledger.seed_sample_products(caller.id())?;
    Ok(Json(json!({
        "success": true,
        "message": report.message(),
        "products": report.created,
        "skipped": report.skipped,
    })))
}
