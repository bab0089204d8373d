//! Route table

use axum::{
    routing::{get, post},
    Router,
};

use crate::escrow_handlers::{
    dispute, get_entry, get_entry_by_ref, mark_held, open_escrow, release, resolve_dispute,
};
use crate::fee_handlers::{get_schedule, health_check, quote_fees};
use crate::ApiState;

pub fn create_routes() -> Router<ApiState> {
    Router::new()
        .route("/v1/health", get(health_check))
        .route("/v1/schedule", get(get_schedule))
        .route("/v1/fees/quote", post(quote_fees))
        .route("/v1/escrow", post(open_escrow))
        .route("/v1/escrow/{id}", get(get_entry))
        .route("/v1/escrow/by-ref/{transaction_ref}", get(get_entry_by_ref))
        .route("/v1/escrow/{id}/hold", post(mark_held))
        .route("/v1/escrow/{id}/release", post(release))
        .route("/v1/escrow/{id}/dispute", post(dispute))
        .route("/v1/escrow/{id}/resolve", post(resolve_dispute))
}
