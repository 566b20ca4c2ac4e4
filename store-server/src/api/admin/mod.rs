//! Admin API 模块
//!
//! /api/admin 子树整体挂 require_admin 中间件；
//! require_auth 已在 Router 级别先行注入 CurrentUser。

mod orders;
mod products;
mod reviews;
mod users;

use axum::{
    Router, middleware,
    routing::{delete, get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/admin/products", product_routes())
        .nest("/api/admin/orders", order_routes())
        .nest("/api/admin/reviews", review_routes())
        .nest("/api/admin/users", user_routes())
        .layer(middleware::from_fn(require_admin))
}

fn product_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            put(products::update).delete(products::delete),
        )
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(orders::list))
        .route("/{id}", get(orders::get_by_id).delete(orders::delete))
        .route("/{id}/status", put(orders::update_status))
        .route("/{id}/payment", put(orders::update_payment))
}

fn review_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(reviews::list))
        .route("/{id}", delete(reviews::delete))
        .route("/{id}/status", put(reviews::update_status))
}

fn user_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(users::list))
        .route("/{id}", delete(users::delete))
        .route("/{id}/role", put(users::update_role))
}
