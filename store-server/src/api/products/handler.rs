//! Product API Handlers (storefront)

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::Product;
use crate::db::repository::{ProductRepository, product::ProductFilter};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_products: i64,
}

/// GET /api/products - 商品列表 (分页 + 过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<ProductListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let filter = ProductFilter {
        search: query.search,
        category: query.category,
        min_price: query.min_price,
        max_price: query.max_price,
        active_only: true,
    };

    let repo = ProductRepository::new(state.db.clone());
    let result = repo.find_page(&filter, page, limit).await?;

    Ok(Json(ProductListResponse {
        current_page: page,
        total_pages: result.total_pages(limit),
        total_products: result.total,
        products: result.items,
    }))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;
    Ok(Json(product))
}
