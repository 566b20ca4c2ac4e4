//! Admin Product Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::{ProductRepository, product::ProductFilter};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProductListResponse {
    pub products: Vec<Product>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_products: i64,
}

fn validate_price(amount: f64) -> AppResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::validation("price must be a non-negative amount"));
    }
    if amount > crate::checkout::money::MAX_PRICE {
        return Err(AppError::validation("price exceeds maximum allowed"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProductListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// GET /api/admin/products - 商品列表 (含下架商品)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AdminProductListQuery>,
) -> AppResult<Json<AdminProductListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let filter = ProductFilter {
        search: query.search,
        category: query.category,
        min_price: query.min_price,
        max_price: query.max_price,
        active_only: false,
    };

    let repo = ProductRepository::new(state.db.clone());
    let result = repo.find_page(&filter, page, limit).await?;

    Ok(Json(AdminProductListResponse {
        current_page: page,
        total_pages: result.total_pages(limit),
        total_products: result.total,
        products: result.items,
    }))
}

/// POST /api/admin/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.sku, "sku", MAX_NAME_LEN)?;
    validate_price(payload.price.amount)?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/admin/products/:id - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(price) = &payload.price {
        validate_price(price.amount)?;
    }

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.update(&id, payload).await?;
    Ok(Json(product))
}

/// DELETE /api/admin/products/:id - 删除商品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let repo = ProductRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Product deleted successfully" }),
    ))
}
