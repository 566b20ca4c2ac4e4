//! Wishlist API Handlers
//!
//! 支持登录用户和游客：游客身份来自 X-Guest-ID 请求头，
//! 服务端在缺失时分配一个并通过响应头返回。

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{CurrentUser, MaybeUser};
use crate::core::ServerState;
use crate::db::models::Wishlist;
use crate::db::repository::{ProductRepository, WishlistRepository, make_record_id};
use crate::utils::{AppError, AppResult};

const GUEST_ID_HEADER: &str = "x-guest-id";

/// Resolved wishlist owner: a logged-in user or a guest id
struct WishlistIdentity {
    user: String,
    is_guest: bool,
}

fn resolve_identity(user: &MaybeUser, headers: &HeaderMap) -> WishlistIdentity {
    match &user.0 {
        Some(user) => WishlistIdentity {
            user: user.id.clone(),
            is_guest: false,
        },
        None => {
            let guest_id = headers
                .get(GUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(String::from)
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            WishlistIdentity {
                user: guest_id,
                is_guest: true,
            }
        }
    }
}

/// Echo the guest id back so the client can persist it
fn guest_headers(identity: &WishlistIdentity) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if identity.is_guest
        && let Ok(value) = HeaderValue::from_str(&identity.user)
    {
        headers.insert("X-Guest-ID", value);
    }
    headers
}

#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    pub product_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub guest_id: String,
}

/// GET /api/wishlist - 获取心愿单
pub async fn get_wishlist(
    State(state): State<ServerState>,
    user: MaybeUser,
    headers: HeaderMap,
) -> AppResult<(HeaderMap, Json<Wishlist>)> {
    let identity = resolve_identity(&user, &headers);
    let repo = WishlistRepository::new(state.db.clone());
    let wishlist = repo.get_or_create(&identity.user, identity.is_guest).await?;
    Ok((guest_headers(&identity), Json(wishlist)))
}

/// POST /api/wishlist/add - 收藏商品
pub async fn add_product(
    State(state): State<ServerState>,
    user: MaybeUser,
    headers: HeaderMap,
    Json(payload): Json<AddProductRequest>,
) -> AppResult<(HeaderMap, Json<Wishlist>)> {
    let identity = resolve_identity(&user, &headers);

    let product = ProductRepository::new(state.db.clone())
        .find_by_id(&payload.product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", payload.product_id)))?;
    let product_id = product
        .id
        .ok_or_else(|| AppError::internal("Stored product has no id"))?;

    let repo = WishlistRepository::new(state.db.clone());
    let mut wishlist = repo.get_or_create(&identity.user, identity.is_guest).await?;
    if wishlist.add_product(product_id) {
        wishlist = repo.save(&wishlist).await?;
    }

    Ok((guest_headers(&identity), Json(wishlist)))
}

/// DELETE /api/wishlist/remove/:product_id - 取消收藏
pub async fn remove_product(
    State(state): State<ServerState>,
    user: MaybeUser,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> AppResult<(HeaderMap, Json<Wishlist>)> {
    let identity = resolve_identity(&user, &headers);

    let repo = WishlistRepository::new(state.db.clone());
    let mut wishlist = repo.get_or_create(&identity.user, identity.is_guest).await?;
    wishlist.remove_product(&make_record_id("product", &product_id));
    let wishlist = repo.save(&wishlist).await?;

    Ok((guest_headers(&identity), Json(wishlist)))
}

/// POST /api/wishlist/clear - 清空心愿单
pub async fn clear(
    State(state): State<ServerState>,
    user: MaybeUser,
    headers: HeaderMap,
) -> AppResult<(HeaderMap, Json<Wishlist>)> {
    let identity = resolve_identity(&user, &headers);

    let repo = WishlistRepository::new(state.db.clone());
    let mut wishlist = repo.get_or_create(&identity.user, identity.is_guest).await?;
    wishlist.products.clear();
    let wishlist = repo.save(&wishlist).await?;

    Ok((guest_headers(&identity), Json(wishlist)))
}

/// POST /api/wishlist/merge - 登录后合并游客心愿单 (去重取并集)
pub async fn merge(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<MergeRequest>,
) -> AppResult<Json<Wishlist>> {
    let repo = WishlistRepository::new(state.db.clone());

    let mut user_wishlist = repo.get_or_create(&user.id, false).await?;

    if let Some(guest_wishlist) = repo.find_by_user(&payload.guest_id, true).await? {
        user_wishlist.merge_from(&guest_wishlist);
        user_wishlist = repo.save(&user_wishlist).await?;
        repo.delete(&guest_wishlist).await?;
    }

    Ok(Json(user_wishlist))
}
