//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

// Auth
pub mod user;

// Catalog
pub mod product;

// Shopping
pub mod cart;
pub mod order;
pub mod review;
pub mod wishlist;

// Re-exports
pub use cart::CartRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use review::ReviewRepository;
pub use user::UserRepository;
pub use wishlist::WishlistRepository;

use serde::Serialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for crate::utils::AppError {
    fn from(err: RepoError) -> Self {
        use crate::utils::AppError;
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "product:abc".parse()?;
//   - 创建: let id = RecordId::from_table_key("product", "abc");
//   - API 层接受 "table:id" 或裸 id，make_record_id 统一归一化

/// Normalize an incoming id string into a RecordId for the given table.
/// Accepts both "table:id" and bare "id" forms.
pub fn make_record_id(table: &str, id: &str) -> RecordId {
    if let Ok(rid) = id.parse::<RecordId>()
        && rid.table() == table
    {
        return rid;
    }
    let key = id.strip_prefix(&format!("{table}:")).unwrap_or(id);
    RecordId::from_table_key(table, key)
}

/// Serialize an entity to a JSON object with the `id` field removed,
/// for `UPDATE $id CONTENT $data` style full replacement.
pub fn content_without_id<T: Serialize>(value: &T) -> RepoResult<serde_json::Value> {
    let mut data = serde_json::to_value(value)
        .map_err(|e| RepoError::Database(format!("Serialization failed: {e}")))?;
    if let Some(obj) = data.as_object_mut() {
        obj.remove("id");
    }
    Ok(data)
}

/// Row shape for `SELECT count() ... GROUP ALL` queries
#[derive(Debug, serde::Deserialize)]
pub struct CountRow {
    pub count: i64,
}

/// A page of results plus the unpaginated total
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self, limit: i64) -> i64 {
        if limit <= 0 {
            return 0;
        }
        (self.total + limit - 1) / limit
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
