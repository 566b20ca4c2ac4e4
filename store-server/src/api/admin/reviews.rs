//! Admin Review Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Review, ReviewStatus, ReviewStatusUpdate, compute_review_stats};
use crate::db::repository::{ProductRepository, ReviewRepository};
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct AdminReviewListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<ReviewStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminReviewListResponse {
    pub reviews: Vec<Review>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_reviews: i64,
}

/// Recompute the product's stats after a moderation change
async fn refresh_product_stats(state: &ServerState, review: &Review) -> AppResult<()> {
    let ratings = ReviewRepository::new(state.db.clone())
        .ratings_for_product(&review.product)
        .await?;
    ProductRepository::new(state.db.clone())
        .set_review_stats(&review.product.to_string(), compute_review_stats(&ratings))
        .await?;
    Ok(())
}

/// GET /api/admin/reviews - 评论列表 (可按审核状态过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AdminReviewListQuery>,
) -> AppResult<Json<AdminReviewListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let repo = ReviewRepository::new(state.db.clone());
    let result = repo.find_page(query.status, page, limit).await?;

    Ok(Json(AdminReviewListResponse {
        current_page: page,
        total_pages: result.total_pages(limit),
        total_reviews: result.total,
        reviews: result.items,
    }))
}

/// PUT /api/admin/reviews/:id/status - 审核评论
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReviewStatusUpdate>,
) -> AppResult<Json<Review>> {
    let repo = ReviewRepository::new(state.db.clone());
    let review = repo.update_status(&id, payload.status).await?;

    // 审核状态影响商品统计 (rejected 被排除在外)
    refresh_product_stats(&state, &review).await?;

    Ok(Json(review))
}

/// DELETE /api/admin/reviews/:id - 删除评论
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let repo = ReviewRepository::new(state.db.clone());
    let review = repo.delete(&id).await?;

    refresh_product_stats(&state, &review).await?;

    Ok(Json(
        serde_json::json!({ "message": "Review deleted successfully" }),
    ))
}
