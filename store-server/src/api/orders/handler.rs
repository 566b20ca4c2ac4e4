//! Orders API Handlers
//!
//! 下单和支付对账接口；核心流程在 [`crate::checkout`]。

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::checkout::{CheckoutRequest, CheckoutService, VerifyOutcome};
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub shipping_address: String,
    pub billing_address: Option<String>,
    pub delivery_option: Option<String>,
    pub mobile_number: String,
}

impl From<PlaceOrderRequest> for CheckoutRequest {
    fn from(req: PlaceOrderRequest) -> Self {
        Self {
            shipping_address: req.shipping_address,
            billing_address: req.billing_address,
            delivery_option: req.delivery_option,
            mobile_number: req.mobile_number,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub message: String,
    pub order: Order,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrderResponse {
    /// Gateway-side order id the client hands to the payment widget
    pub order_id: String,
    /// Amount in minor currency units
    pub amount: i64,
    pub currency: String,
    pub order: Order,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub gateway_signature: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}

/// POST /api/orders - 直接下单 (不经支付网关)
pub async fn create_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<(StatusCode, Json<PlaceOrderResponse>)> {
    let service = CheckoutService::from_state(&state);
    let order = service.place_direct_order(&user.id, payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: "Order created successfully".to_string(),
            order,
        }),
    ))
}

/// POST /api/orders/create-gateway-order - 发起网关结账
pub async fn create_gateway_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<GatewayOrderResponse>> {
    let service = CheckoutService::from_state(&state);
    let (gateway_order, order) = service
        .initiate_gateway_checkout(&user.id, payload.into())
        .await?;

    Ok(Json(GatewayOrderResponse {
        order_id: gateway_order.id,
        amount: gateway_order.amount,
        currency: gateway_order.currency,
        order,
    }))
}

/// POST /api/orders/verify-payment - 支付回调对账 (公开路由，靠签名校验)
pub async fn verify_payment(
    State(state): State<ServerState>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> AppResult<Json<VerifyPaymentResponse>> {
    let service = CheckoutService::from_state(&state);
    let outcome = service
        .verify_payment(
            &payload.gateway_order_id,
            &payload.gateway_payment_id,
            &payload.gateway_signature,
        )
        .await?;

    let response = match outcome {
        VerifyOutcome::Verified(order) => VerifyPaymentResponse {
            success: true,
            message: "Payment has been verified".to_string(),
            order: Some(order),
        },
        VerifyOutcome::SignatureMismatch => VerifyPaymentResponse {
            success: false,
            message: "Payment verification failed".to_string(),
            order: None,
        },
    };

    Ok(Json(response))
}

/// GET /api/orders/history - 当前用户的历史订单
pub async fn history(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_by_user(&user.id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 获取本人订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .filter(|order| order.user == user.id)
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    Ok(Json(order))
}
