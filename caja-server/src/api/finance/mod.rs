//! Finance API module (register shift ledger)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/finance", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/current", get(handler::get_current))
        .route("/open", post(handler::open))
        .route("/movement", post(handler::post_movement))
        .route("/movement/{id}/reverse", post(handler::reverse_movement))
        .route("/close", post(handler::close))
        .route("/reopen", post(handler::reopen))
        .route("/history", get(handler::history))
        .route("/history/{id}", get(handler::get_shift))
}
