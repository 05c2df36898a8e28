//! `/users` routes: provisioning, lifecycle and QR payloads.
//!
//! The identity service applies the capability policy itself because the
//! decision depends on the target record.

use crate::domain::ApiResult;
use crate::middleware::{ApiJson, ApiPath, Caller};
use crate::router::AppState;
use axum::extract::State;
use axum::Json;
use sc_01_identity::{NewUser, User, UserSummary};
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::{UserId, UserStatus};

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: UserStatus,
}

pub(crate) fn summaries(users: Vec<User>) -> Vec<UserSummary> {
    users.iter().map(User::summary).collect()
}

pub async fn provision(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(request): ApiJson<NewUser>,
) -> ApiResult<Json<Value>> {
    let user = state.identity.provision_user(&caller.principal, &request)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("{} created. Pending verification.", user.role.display_name()),
        "user": user.summary(),
    })))
}

pub async fn set_status(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<UserId>,
    ApiJson(body): ApiJson<StatusBody>,
) -> ApiResult<Json<Value>> {
    let user = state
        .identity
        .set_status(&caller.principal, id, body.status)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("{} {}", user.role.display_name(), user.status),
        "user": user.summary(),
    })))
}

pub async fn barbenders(State(state): State<AppState>, caller: Caller) -> ApiResult<Json<Value>> {
    let barbenders = state.identity.barbenders_of(&caller.principal)?;
    Ok(Json(json!({ "barbenders": summaries(barbenders) })))
}

pub async fn qr(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<UserId>,
) -> ApiResult<Json<Value>> {
    let payload = state.identity.qr_payload(&caller.principal, id)?;
    Ok(Json(json!({ "success": true, "qrData": payload })))
}
