//! Orders API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create_order))
        .route("/create-gateway-order", post(handler::create_gateway_order))
        .route("/verify-payment", post(handler::verify_payment))
        .route("/history", get(handler::history))
        .route("/{id}", get(handler::get_by_id))
}
