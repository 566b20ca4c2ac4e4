//! Checkout Workflow
//!
//! 购物车 → 订单的转换和支付对账：
//! - 直接下单 (货到付款类流程，不经网关)
//! - 网关下单 (先建网关订单，支付确认后才清空购物车)
//! - 支付回调对账 (签名校验 + 状态落库)
//!
//! 每一步都是独立的数据库写入，没有事务包裹；verify_payment 更新订单
//! 和清空购物车之间的失败会留下"已支付但购物车未清空"的状态，按异常
//! 上报而不是静默吞掉。

pub mod money;

#[cfg(test)]
mod tests;

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::ServerState;
use crate::db::models::{Cart, Order, OrderItem};
use crate::db::repository::{CartRepository, OrderRepository};
use crate::payment::{GatewayOrder, PaymentGateway, verify_payment_signature};
use crate::utils::validation::{MAX_ADDRESS_LEN, validate_mobile_number, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Delivery option carrying an expedited surcharge
pub const DELIVERY_EXPRESS: &str = "express";

/// Validated checkout input
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub shipping_address: String,
    pub billing_address: Option<String>,
    pub delivery_option: Option<String>,
    pub mobile_number: String,
}

impl CheckoutRequest {
    /// Validate the request before any workflow step runs
    pub fn validate(&self) -> AppResult<()> {
        validate_mobile_number(&self.mobile_number)?;
        validate_required_text(&self.shipping_address, "shipping_address", MAX_ADDRESS_LEN)?;
        Ok(())
    }
}

/// Outcome of a payment-callback verification
#[derive(Debug)]
pub enum VerifyOutcome {
    /// Signature checked out; order updated, cart cleared
    Verified(Order),
    /// Signature mismatch; nothing was mutated
    SignatureMismatch,
}

/// Checkout workflow service
#[derive(Clone)]
pub struct CheckoutService {
    db: Surreal<Db>,
    gateway: PaymentGateway,
    express_delivery_fee: f64,
    currency: String,
}

impl CheckoutService {
    pub fn new(
        db: Surreal<Db>,
        gateway: PaymentGateway,
        express_delivery_fee: f64,
        currency: String,
    ) -> Self {
        Self {
            db,
            gateway,
            express_delivery_fee,
            currency,
        }
    }

    pub fn from_state(state: &ServerState) -> Self {
        Self::new(
            state.db.clone(),
            state.gateway.clone(),
            state.config.express_delivery_fee,
            state.config.currency.clone(),
        )
    }

    /// Flat surcharge for expedited delivery, zero otherwise
    pub fn delivery_fee(&self, delivery_option: Option<&str>) -> f64 {
        match delivery_option {
            Some(DELIVERY_EXPRESS) => self.express_delivery_fee,
            _ => 0.0,
        }
    }

    /// Load the caller's cart, failing when it is missing or empty
    async fn require_cart(&self, user: &str) -> AppResult<Cart> {
        let cart = CartRepository::new(self.db.clone())
            .find_by_user(user)
            .await?;
        match cart {
            Some(cart) if !cart.is_empty() => Ok(cart),
            _ => Err(AppError::BusinessRule("Cart is empty".to_string())),
        }
    }

    /// Snapshot the cart into an immutable order
    fn snapshot_order(
        user: &str,
        cart: &Cart,
        req: &CheckoutRequest,
        delivery_fee: f64,
        total: f64,
        gateway_order_id: Option<String>,
    ) -> Order {
        Order {
            id: None,
            user: user.to_string(),
            items: cart
                .items
                .iter()
                .map(|item| OrderItem {
                    product: item.product.clone(),
                    product_name: item.name.clone(),
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
            subtotal: cart.subtotal,
            discount: cart.discount,
            delivery_fee,
            total,
            shipping_address: req.shipping_address.clone(),
            billing_address: req.billing_address.clone(),
            delivery_option: req.delivery_option.clone(),
            mobile_number: req.mobile_number.clone(),
            status: Default::default(),
            payment_status: Default::default(),
            gateway_order_id,
            gateway_payment_id: None,
            gateway_signature: None,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Direct (no-gateway) order path
    ///
    /// 不经支付校验直接落单并清空购物车 (货到付款流程，信任客户端)。
    pub async fn place_direct_order(&self, user: &str, req: CheckoutRequest) -> AppResult<Order> {
        req.validate()?;
        let cart = self.require_cart(user).await?;

        let order = Self::snapshot_order(user, &cart, &req, 0.0, cart.total, None);
        let order = OrderRepository::new(self.db.clone()).create(order).await?;

        // Clear the cart unconditionally
        let mut cart = cart;
        cart.clear();
        CartRepository::new(self.db.clone()).save(&cart).await?;

        tracing::info!(
            user = %user,
            order_id = %order.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            total = order.total,
            "Direct order placed"
        );

        Ok(order)
    }

    /// Initiate a gateway checkout: create the remote gateway order first,
    /// then persist the local order referencing it.
    ///
    /// On gateway failure no local state changes. The cart is NOT cleared
    /// here; that happens only on confirmed payment.
    pub async fn initiate_gateway_checkout(
        &self,
        user: &str,
        req: CheckoutRequest,
    ) -> AppResult<(GatewayOrder, Order)> {
        req.validate()?;
        let cart = self.require_cart(user).await?;

        let delivery_fee = self.delivery_fee(req.delivery_option.as_deref());
        let total = money::add(cart.total, delivery_fee);

        let receipt = format!("order_receipt_{}", Utc::now().timestamp_millis());
        let gateway_order = self
            .gateway
            .create_order(money::to_minor_units(total), &self.currency, &receipt)
            .await?;

        let order = Self::snapshot_order(
            user,
            &cart,
            &req,
            delivery_fee,
            total,
            Some(gateway_order.id.clone()),
        );
        let order = OrderRepository::new(self.db.clone()).create(order).await?;

        tracing::info!(
            user = %user,
            gateway_order_id = %gateway_order.id,
            total = order.total,
            "Gateway checkout initiated"
        );

        Ok((gateway_order, order))
    }

    /// Reconcile an inbound payment callback against its order
    ///
    /// Signature mismatch mutates nothing. A replayed valid payload
    /// re-runs the same update; the Pending→Paid transition is
    /// one-directional so the effect is idempotent, but a repeat call is
    /// not a new payment.
    pub async fn verify_payment(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
    ) -> AppResult<VerifyOutcome> {
        if !verify_payment_signature(
            gateway_order_id,
            gateway_payment_id,
            signature,
            self.gateway.key_secret(),
        ) {
            tracing::warn!(
                gateway_order_id = %gateway_order_id,
                "Payment verification failed: signature mismatch"
            );
            return Ok(VerifyOutcome::SignatureMismatch);
        }

        let order_repo = OrderRepository::new(self.db.clone());
        let order = order_repo
            .find_by_gateway_order_id(gateway_order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order for {gateway_order_id}")))?;

        let order_id = order
            .id
            .as_ref()
            .map(|id| id.to_string())
            .ok_or_else(|| AppError::internal("Stored order has no id"))?;
        let updated = order_repo
            .mark_paid(&order_id, gateway_payment_id, signature)
            .await?;

        // Second, non-atomic write: a failure here leaves a paid order
        // with a non-cleared cart. Recoverable, but must be reported.
        if let Err(e) = CartRepository::new(self.db.clone())
            .clear_for_user(&updated.user)
            .await
        {
            tracing::warn!(
                order_id = %order_id,
                user = %updated.user,
                error = %e,
                "Payment recorded but cart clear failed; cart left stale"
            );
            return Err(e.into());
        }

        tracing::info!(
            order_id = %order_id,
            gateway_payment_id = %gateway_payment_id,
            "Payment verified and reconciled"
        );

        Ok(VerifyOutcome::Verified(updated))
    }
}
