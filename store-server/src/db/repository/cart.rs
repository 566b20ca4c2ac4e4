//! Cart Repository
//!
//! 每个用户一个购物车；首次访问时惰性创建。
//! 读-改-写之间没有版本校验，两个并发写入以后写为准 (已知限制)。

use super::{BaseRepository, RepoError, RepoResult, content_without_id};
use crate::db::models::Cart;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "cart";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the cart belonging to a user
    pub async fn find_by_user(&self, user: &str) -> RepoResult<Option<Cart>> {
        let user_owned = user.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user = $user LIMIT 1")
            .bind(("user", user_owned))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Get the user's cart, lazily creating an empty one on first access
    pub async fn get_or_create(&self, user: &str) -> RepoResult<Cart> {
        if let Some(mut cart) = self.find_by_user(user).await? {
            // 读取时重算一遍，清除历史数据中可能存在的失真金额
            cart.recalculate();
            return Ok(cart);
        }

        let cart = Cart::new(user);
        let created: Option<Cart> = self.base.db().create(TABLE).content(cart).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cart".to_string()))
    }

    /// Persist the cart, replacing the stored document
    pub async fn save(&self, cart: &Cart) -> RepoResult<Cart> {
        match &cart.id {
            Some(rid) => {
                let data = content_without_id(cart)?;
                let mut result = self
                    .base
                    .db()
                    .query("UPDATE $id CONTENT $data RETURN AFTER")
                    .bind(("id", rid.clone()))
                    .bind(("data", data))
                    .await?;
                let carts: Vec<Cart> = result.take(0)?;
                carts
                    .into_iter()
                    .next()
                    .ok_or_else(|| RepoError::NotFound("Cart not found".to_string()))
            }
            None => {
                let created: Option<Cart> =
                    self.base.db().create(TABLE).content(cart.clone()).await?;
                created.ok_or_else(|| RepoError::Database("Failed to save cart".to_string()))
            }
        }
    }

    /// Empty the cart of the given user and zero its totals
    ///
    /// Used by payment reconciliation, where the cart may belong to a
    /// different user than the caller.
    pub async fn clear_for_user(&self, user: &str) -> RepoResult<()> {
        if let Some(mut cart) = self.find_by_user(user).await? {
            cart.clear();
            self.save(&cart).await?;
        }
        Ok(())
    }
}
