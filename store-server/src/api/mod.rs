//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`products`] - 商品浏览接口 (公开)
//! - [`cart`] - 购物车接口
//! - [`orders`] - 下单和支付对账接口
//! - [`reviews`] - 商品评论接口
//! - [`wishlist`] - 心愿单接口 (支持游客)
//! - [`admin`] - 后台管理接口 (商品/订单/评论/用户)

pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod wishlist;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
