//! Admin User Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{ROLE_ADMIN, ROLE_USER, UserResponse};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct AdminUserListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserListResponse {
    pub users: Vec<UserResponse>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_users: i64,
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdateRequest {
    pub role: String,
}

/// GET /api/admin/users - 用户列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AdminUserListQuery>,
) -> AppResult<Json<AdminUserListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let repo = UserRepository::new(state.db.clone());
    let result = repo.find_page(page, limit).await?;

    Ok(Json(AdminUserListResponse {
        current_page: page,
        total_pages: result.total_pages(limit),
        total_users: result.total,
        users: result.items.into_iter().map(Into::into).collect(),
    }))
}

/// PUT /api/admin/users/:id/role - 调整角色
pub async fn update_role(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RoleUpdateRequest>,
) -> AppResult<Json<UserResponse>> {
    if payload.role != ROLE_USER && payload.role != ROLE_ADMIN {
        return Err(AppError::validation("role must be 'user' or 'admin'"));
    }

    let repo = UserRepository::new(state.db.clone());
    let user = repo.update_role(&id, &payload.role).await?;
    Ok(Json(user.into()))
}

/// DELETE /api/admin/users/:id - 删除用户
pub async fn delete(
    State(state): State<ServerState>,
    admin: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    // 管理员不能删除自己
    if admin.id == id || admin.id == format!("user:{id}") {
        return Err(AppError::validation("cannot delete your own account"));
    }

    let repo = UserRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(
        serde_json::json!({ "message": "User deleted successfully" }),
    ))
}
