//! Admin Order Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Order, OrderPaymentUpdate, OrderStatusUpdate};
use crate::db::repository::{OrderRepository, order::OrderFilter};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub min_total: Option<f64>,
    pub max_total: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderListResponse {
    pub orders: Vec<Order>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_orders: i64,
}

/// GET /api/admin/orders - 订单列表 (分页 + 过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AdminOrderListQuery>,
) -> AppResult<Json<AdminOrderListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let filter = OrderFilter {
        status: query.status,
        payment_status: query.payment_status,
        min_total: query.min_total,
        max_total: query.max_total,
    };

    let repo = OrderRepository::new(state.db.clone());
    let result = repo.find_page(&filter, page, limit).await?;

    Ok(Json(AdminOrderListResponse {
        current_page: page,
        total_pages: result.total_pages(limit),
        total_orders: result.total,
        orders: result.items,
    }))
}

/// GET /api/admin/orders/:id - 获取订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    Ok(Json(order))
}

/// PUT /api/admin/orders/:id/status - 部分更新状态
///
/// status / payment_status 均可选；不限制迁移方向。
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    if payload.status.is_none() && payload.payment_status.is_none() {
        return Err(AppError::validation(
            "at least one of status / payment_status is required",
        ));
    }

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.update_status(&id, payload).await?;
    Ok(Json(order))
}

/// PUT /api/admin/orders/:id/payment - 手工录入支付信息
pub async fn update_payment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderPaymentUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo.update_payment(&id, payload).await?;
    Ok(Json(order))
}

/// DELETE /api/admin/orders/:id - 删除订单 (不级联清理)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let repo = OrderRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Order deleted successfully" }),
    ))
}
