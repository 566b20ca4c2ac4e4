//! Reviews API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Review, ReviewCreate, ReviewStats, compute_review_stats};
use crate::db::repository::{ProductRepository, ReviewRepository, make_record_id};
use crate::utils::validation::{MAX_COMMENT_LEN, validate_rating};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListResponse {
    pub reviews: Vec<Review>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_reviews: i64,
    pub product_review_stats: Option<ReviewStats>,
}

/// Recompute and store the product's denormalized review stats
async fn refresh_product_stats(
    state: &ServerState,
    product_id: &surrealdb::RecordId,
) -> AppResult<()> {
    let ratings = ReviewRepository::new(state.db.clone())
        .ratings_for_product(product_id)
        .await?;
    ProductRepository::new(state.db.clone())
        .set_review_stats(&product_id.to_string(), compute_review_stats(&ratings))
        .await?;
    Ok(())
}

/// POST /api/reviews - 发表评论 (每个用户每件商品一条)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<(StatusCode, Json<Review>)> {
    validate_rating(payload.rating)?;
    if payload.comment.len() > MAX_COMMENT_LEN {
        return Err(AppError::validation("comment is too long"));
    }

    let product_repo = ProductRepository::new(state.db.clone());
    let product = product_repo
        .find_by_id(&payload.product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", payload.product_id)))?;
    let product_id = product
        .id
        .ok_or_else(|| AppError::internal("Stored product has no id"))?;

    let review = Review {
        id: None,
        user: user.id.clone(),
        user_name: user.name.clone(),
        product: product_id.clone(),
        rating: payload.rating,
        comment: payload.comment,
        status: Default::default(),
        helpful: 0,
        created_at: Utc::now().to_rfc3339(),
    };

    let review = ReviewRepository::new(state.db.clone()).create(review).await?;
    refresh_product_stats(&state, &product_id).await?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/reviews/product/:product_id - 商品评论列表 (公开)
pub async fn list_for_product(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
    Query(query): Query<ReviewListQuery>,
) -> AppResult<Json<ReviewListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let product_rid = make_record_id("product", &product_id);
    let result = ReviewRepository::new(state.db.clone())
        .find_public_page(&product_rid, page, limit)
        .await?;

    let product = ProductRepository::new(state.db.clone())
        .find_by_id(&product_id)
        .await?;

    Ok(Json(ReviewListResponse {
        current_page: page,
        total_pages: result.total_pages(limit),
        total_reviews: result.total,
        reviews: result.items,
        product_review_stats: product.map(|p| p.review_stats),
    }))
}

/// POST /api/reviews/:id/helpful - 点赞评论
pub async fn mark_helpful(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Review>> {
    let review = ReviewRepository::new(state.db.clone())
        .increment_helpful(&id)
        .await?;
    Ok(Json(review))
}
