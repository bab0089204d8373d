//! Fee quote and schedule handlers

use axum::{extract::State, Json};
use market_core::{Amount, EscrowDecision, FeeBreakdown, TaskType};
use serde::{Deserialize, Serialize};

use crate::{ApiResult, ApiState};

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    /// Gross amount in minor units (cents)
    pub amount: Amount,
    pub task_type: TaskType,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub breakdown: FeeBreakdown,
    pub escrow: EscrowDecision,
}

/// Compute the fee breakdown and custody decision for one amount.
/// Pure; safe to call any number of times.
pub async fn quote_fees(
    State(state): State<ApiState>,
    Json(req): Json<QuoteRequest>,
) -> ApiResult<Json<QuoteResponse>> {
    let breakdown = state.calculator.compute(req.amount, req.task_type)?;
    let escrow = state.policy.decide(req.amount, req.task_type)?;
    Ok(Json(QuoteResponse { breakdown, escrow }))
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub schedule: market_core::FeeSchedule,
    pub hold_period_secs: u64,
}

/// The active fee schedule, for auditability
pub async fn get_schedule(State(state): State<ApiState>) -> Json<ScheduleResponse> {
    Json(ScheduleResponse {
        schedule: (*state.schedule).clone(),
        hold_period_secs: state.scheduler.hold_period_secs(),
    })
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
