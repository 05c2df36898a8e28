//! `/auth` routes: OTP login and session tokens.

use crate::domain::ApiResult;
use crate::middleware::{ApiJson, BearerToken, Caller};
use crate::router::AppState;
use axum::extract::State;
use axum::Json;
use sc_01_identity::{authorize, Action};
use sc_02_otp_auth::SmsStatus;
use serde::Deserialize;
use serde_json::{json, Value};
use steel_telemetry::{record_otp_sent, record_otp_verification};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCodeBody {
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub phone_no: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeBody {
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub phone_no: String,
    #[serde(default, alias = "code")]
    pub otp: String,
}

pub async fn send_code(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SendCodeBody>,
) -> ApiResult<Json<Value>> {
    let outcome = state
        .auth
        .send_code(&body.country_code, &body.phone_no)
        .await?;
    record_otp_sent(match outcome.sms_status {
        SmsStatus::Sent => "sent",
        SmsStatus::Pending => "pending",
    });
    Ok(Json(json!({ "success": true, "data": outcome })))
}

pub async fn verify_code(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<VerifyCodeBody>,
) -> ApiResult<Json<Value>> {
    match state
        .auth
        .verify_code(&body.country_code, &body.phone_no, &body.otp)
    {
        Ok(session) => {
            record_otp_verification("success");
            Ok(Json(json!({ "success": true, "data": session })))
        }
        Err(err) => {
            record_otp_verification(err.kind().as_str());
            Err(err.into())
        }
    }
}

pub async fn verify_token(caller: Caller) -> Json<Value> {
    Json(json!({
        "valid": true,
        "userId": caller.id(),
        "user": caller.identity,
        "welcomeMessage": caller.identity.role.welcome_message(),
    }))
}

/// Accepts an expired token; the signature must still verify.
pub async fn refresh_token(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<Json<Value>> {
    let refreshed = state.auth.refresh_token(&token)?;
    Ok(Json(json!({
        "message": "Token refreshed successfully",
        "token": refreshed.token,
        "expiresAt": refreshed.expires_at,
        "userId": refreshed.user.id,
    })))
}

/// Profile with the ledger's balances projected onto it.
pub async fn profile(State(state): State<AppState>, caller: Caller) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ViewProfile)?;
    let user = state.identity.get_user(caller.id())?;
    let balances = state.ledger.balances(caller.id());
    Ok(Json(json!({
        "success": true,
        "user": {
            "id": user.id,
            "name": user.name,
            "phoneNo": user.phone_no,
            "countryCode": user.country_code,
            "email": user.email,
            "role": user.role,
            "roleName": user.role.display_name(),
            "status": user.status,
            "assignedAso": user.assigned_aso,
            "createdBy": user.created_by,
            "lastOtpValidated": user.last_otp_validated,
            "availableQty": balances.available_qty,
            "rewardEligibleQty": balances.reward_eligible_qty,
        },
        "welcomeMessage": user.role.welcome_message(),
    })))
}

/// Tokens are stateless; logout is acknowledged and left to the client.
pub async fn logout(token: Option<BearerToken>) -> Json<Value> {
    let message = if token.is_some() {
        "Logged out successfully"
    } else {
        "Already logged out"
    };
    Json(json!({ "success": true, "message": message }))
}
