//! `/rewards` routes. `?period=YYYY-MM` selects a calendar month; the
//! current month is the default.

use crate::domain::ApiResult;
use crate::middleware::{ApiQuery, Caller};
use crate::router::AppState;
use axum::extract::State;
use axum::Json;
use sc_01_identity::{authorize, Action};
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::Period;
use steel_telemetry::record_reward_claim;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

impl PeriodQuery {
    fn parse(&self) -> ApiResult<Option<Period>> {
        match self.period.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Ok(Some(Period::parse_month(raw)?)),
            _ => Ok(None),
        }
    }
}

pub async fn summary(
    State(state): State<AppState>,
    caller: Caller,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ViewRewards)?;
    let summary = state.rewards.summary(caller.id(), query.parse()?)?;
    Ok(Json(json!({ "success": true, "summary": summary })))
}

pub async fn claim(
    State(state): State<AppState>,
    caller: Caller,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ClaimReward)?;
    let outcome = state.rewards.claim(caller.id(), query.parse()?)?;
    record_reward_claim(outcome.reward_kg.as_kg());
    Ok(Json(json!({
        "success": true,
        "message": outcome.message,
        "rewardKg": outcome.reward_kg,
        "newBalance": outcome.new_balance,
        "reward": outcome.reward,
    })))
}

pub async fn history(State(state): State<AppState>, caller: Caller) -> ApiResult<Json<Value>> {
    authorize(&caller.principal, Action::ViewRewards)?;
    let rewards = state.rewards.history(caller.id())?;
    Ok(Json(json!({ "rewards": rewards })))
}
