//! Wishlist API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/wishlist", wishlist_routes())
}

fn wishlist_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_wishlist))
        .route("/add", post(handler::add_product))
        .route("/remove/{product_id}", delete(handler::remove_product))
        .route("/clear", post(handler::clear))
        .route("/merge", post(handler::merge))
}
