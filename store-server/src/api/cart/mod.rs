//! Cart API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", cart_routes())
}

fn cart_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_cart))
        .route("/add", post(handler::add_item))
        .route("/remove", post(handler::remove_item))
        .route("/update", put(handler::update_quantity))
        .route("/apply-discount", post(handler::apply_discount))
        .route("/clear", post(handler::clear))
}
