//! `/mappings` routes: the ASO↔Dealer registry. Super Admin only.

use super::users::summaries;
use crate::domain::ApiResult;
use crate::middleware::{ApiJson, ApiPath, Caller};
use crate::router::AppState;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::UserId;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapBody {
    pub aso_id: UserId,
    pub dealer_id: UserId,
}

pub async fn map(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(body): ApiJson<MapBody>,
) -> ApiResult<Json<Value>> {
    let mapping = state
        .identity
        .map_dealer_to_aso(&caller.principal, body.aso_id, body.dealer_id)?;
    Ok(Json(json!({
        "success": true,
        "message": "Dealer mapped to ASO",
        "mapping": mapping,
    })))
}

pub async fn unmap(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(dealer_id): ApiPath<UserId>,
) -> ApiResult<Json<Value>> {
    let removed = state.identity.unmap_dealer(&caller.principal, dealer_id)?;
    let message = if removed.is_some() {
        "Mapping removed"
    } else {
        "Dealer was not mapped"
    };
    Ok(Json(json!({
        "success": true,
        "message": message,
        "mapping": removed,
    })))
}

pub async fn list(State(state): State<AppState>, caller: Caller) -> ApiResult<Json<Value>> {
    let mappings = state.identity.active_mappings(&caller.principal)?;
    Ok(Json(json!({ "mappings": mappings })))
}

pub async fn unmapped_dealers(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<Value>> {
    let dealers = state.identity.unmapped_dealers(&caller.principal)?;
    Ok(Json(json!({ "dealers": summaries(dealers) })))
}

pub async fn asos(State(state): State<AppState>, caller: Caller) -> ApiResult<Json<Value>> {
    let asos = state.identity.asos_with_dealers(&caller.principal)?;
    Ok(Json(json!({ "asos": asos })))
}

pub async fn reconcile(State(state): State<AppState>, caller: Caller) -> ApiResult<Json<Value>> {
    let report = state.identity.reconcile(&caller.principal)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("{} repairs applied", report.total_repairs()),
        "report": report,
    })))
}
