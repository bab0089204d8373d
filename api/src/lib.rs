//! HTTP boundary for the fee and escrow engine
//!
//! Thin: handlers validate input, call the core, and map typed errors
//! to JSON responses. The presentation layer is never the source of
//! truth for a transition; everything goes through the ledger.

mod error;
mod escrow_handlers;
mod fee_handlers;
mod routes;
mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_routes;
pub use state::ApiState;

use axum::http::{header::CONTENT_TYPE, Method};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

pub async fn start_server(
    addr: SocketAddr,
    state: ApiState,
) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let app = routes::create_routes().with_state(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
