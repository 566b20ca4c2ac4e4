//! Cart API Handlers
//!
//! 每个变更接口：加载购物车 → 变更 (模型内部重算金额) → 持久化 → 返回。

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Cart;
use crate::db::repository::{CartRepository, ProductRepository, make_record_id};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub product_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub product_id: String,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct ApplyDiscountRequest {
    pub amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountResponse {
    pub message: String,
    pub subtotal: f64,
    pub discount: f64,
    pub new_total: f64,
    pub cart: Cart,
}

fn validate_quantity(quantity: i32) -> AppResult<()> {
    if quantity < 1 {
        return Err(AppError::validation("quantity must be a positive integer"));
    }
    if quantity > crate::checkout::money::MAX_QUANTITY {
        return Err(AppError::validation("quantity exceeds maximum allowed"));
    }
    Ok(())
}

/// GET /api/cart - 获取购物车 (首次访问惰性创建)
pub async fn get_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Cart>> {
    let repo = CartRepository::new(state.db.clone());
    let cart = repo.get_or_create(&user.id).await?;
    // 读取路径也落库，保证重算后的金额被持久化
    let cart = repo.save(&cart).await?;
    Ok(Json(cart))
}

/// POST /api/cart/add - 加入商品
pub async fn add_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<Json<Cart>> {
    validate_quantity(payload.quantity)?;

    let product_repo = ProductRepository::new(state.db.clone());
    let product = product_repo
        .find_by_id(&payload.product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", payload.product_id)))?;

    let product_id = product
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Stored product has no id"))?;

    let cart_repo = CartRepository::new(state.db.clone());
    let mut cart = cart_repo.get_or_create(&user.id).await?;
    cart.add_item(product_id, &product.name, product.price.amount, payload.quantity);

    let cart = cart_repo.save(&cart).await?;
    Ok(Json(cart))
}

/// POST /api/cart/remove - 移除商品
pub async fn remove_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<RemoveItemRequest>,
) -> AppResult<Json<Cart>> {
    let cart_repo = CartRepository::new(state.db.clone());
    let mut cart = cart_repo.get_or_create(&user.id).await?;
    cart.remove_item(&make_record_id("product", &payload.product_id));

    let cart = cart_repo.save(&cart).await?;
    Ok(Json(cart))
}

/// PUT /api/cart/update - 修改数量
pub async fn update_quantity(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<Cart>> {
    validate_quantity(payload.quantity)?;

    let cart_repo = CartRepository::new(state.db.clone());
    let mut cart = cart_repo.get_or_create(&user.id).await?;

    let product_id = make_record_id("product", &payload.product_id);
    if !cart.set_quantity(&product_id, payload.quantity) {
        return Err(AppError::not_found("Item not found in cart"));
    }

    let cart = cart_repo.save(&cart).await?;
    Ok(Json(cart))
}

/// POST /api/cart/apply-discount - 应用折扣
pub async fn apply_discount(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ApplyDiscountRequest>,
) -> AppResult<Json<DiscountResponse>> {
    if !payload.amount.is_finite() || payload.amount < 0.0 {
        return Err(AppError::validation("discount must be a non-negative amount"));
    }

    let cart_repo = CartRepository::new(state.db.clone());
    let mut cart = cart_repo.get_or_create(&user.id).await?;
    let new_total = cart.apply_discount(payload.amount);

    let cart = cart_repo.save(&cart).await?;
    Ok(Json(DiscountResponse {
        message: "Discount applied".to_string(),
        subtotal: cart.subtotal,
        discount: cart.discount,
        new_total,
        cart,
    }))
}

/// POST /api/cart/clear - 清空购物车
pub async fn clear(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Cart>> {
    let cart_repo = CartRepository::new(state.db.clone());
    let mut cart = cart_repo.get_or_create(&user.id).await?;
    cart.clear();

    let cart = cart_repo.save(&cart).await?;
    Ok(Json(cart))
}
