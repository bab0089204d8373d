//! Escrow lifecycle handlers
//!
//! The gateway confirmation callback drives `hold`; support staff and
//! the dispute flow drive `release`/`dispute`/`resolve`. Reads are for
//! display only.

use axum::{
    extract::{Path, State},
    Json,
};
use market_core::{Amount, EscrowDecision, TaskType};
use market_escrow::{DisputeOutcome, EscrowEntry, EscrowError, ReleaseReason};
use serde::{Deserialize, Serialize};

use crate::{ApiResult, ApiState};

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[derive(Debug, Deserialize)]
pub struct OpenEscrowRequest {
    pub transaction_ref: String,
    /// Gross amount in minor units
    pub amount: Amount,
    pub task_type: TaskType,
}

#[derive(Debug, Serialize)]
pub struct OpenEscrowResponse {
    pub decision: EscrowDecision,
    /// Present when custody was required and an entry was created
    pub entry: Option<EscrowEntry>,
}

/// Decide custody for a transaction and open an entry if required.
/// Retried creates surface `duplicate_escrow`; callers then fetch the
/// existing entry via `/v1/escrow/by-ref/{transaction_ref}`.
pub async fn open_escrow(
    State(state): State<ApiState>,
    Json(req): Json<OpenEscrowRequest>,
) -> ApiResult<Json<OpenEscrowResponse>> {
    let decision = state.policy.decide(req.amount, req.task_type)?;
    if !decision.requires_escrow {
        return Ok(Json(OpenEscrowResponse {
            decision,
            entry: None,
        }));
    }

    let entry = state
        .scheduler
        .open(&req.transaction_ref, req.amount, now())?;
    Ok(Json(OpenEscrowResponse {
        decision,
        entry: Some(entry),
    }))
}

/// Payment gateway confirmed funds capture
pub async fn mark_held(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EscrowEntry>> {
    Ok(Json(state.ledger.mark_held(&id)?))
}

#[derive(Debug, Deserialize)]
pub struct ReleaseRequest {
    pub reason: ReleaseReason,
}

pub async fn release(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<ReleaseRequest>,
) -> ApiResult<Json<EscrowEntry>> {
    Ok(Json(state.ledger.release(&id, req.reason, now())?))
}

pub async fn dispute(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EscrowEntry>> {
    Ok(Json(state.ledger.dispute(&id)?))
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub outcome: DisputeOutcome,
}

pub async fn resolve_dispute(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<ResolveRequest>,
) -> ApiResult<Json<EscrowEntry>> {
    Ok(Json(state.ledger.resolve_dispute(&id, req.outcome, now())?))
}

pub async fn get_entry(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EscrowEntry>> {
    Ok(Json(state.ledger.get(&id)?))
}

pub async fn get_entry_by_ref(
    State(state): State<ApiState>,
    Path(transaction_ref): Path<String>,
) -> ApiResult<Json<EscrowEntry>> {
    let entry = state
        .ledger
        .find_by_ref(&transaction_ref)?
        .ok_or(EscrowError::NotFound(transaction_ref))?;
    Ok(Json(entry))
}
