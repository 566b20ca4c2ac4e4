//! Wishlist Repository

use super::{BaseRepository, RepoError, RepoResult, content_without_id};
use crate::db::models::Wishlist;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "wishlist";

#[derive(Clone)]
pub struct WishlistRepository {
    base: BaseRepository,
}

impl WishlistRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the wishlist keyed by a user or guest id
    pub async fn find_by_user(&self, user: &str, is_guest: bool) -> RepoResult<Option<Wishlist>> {
        let user_owned = user.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM wishlist WHERE user = $user AND is_guest = $is_guest LIMIT 1")
            .bind(("user", user_owned))
            .bind(("is_guest", is_guest))
            .await?;
        let wishlists: Vec<Wishlist> = result.take(0)?;
        Ok(wishlists.into_iter().next())
    }

    /// Get the wishlist, lazily creating an empty one
    pub async fn get_or_create(&self, user: &str, is_guest: bool) -> RepoResult<Wishlist> {
        if let Some(wishlist) = self.find_by_user(user, is_guest).await? {
            return Ok(wishlist);
        }

        let wishlist = Wishlist::new(user, is_guest);
        let created: Option<Wishlist> = self.base.db().create(TABLE).content(wishlist).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create wishlist".to_string()))
    }

    /// Persist the wishlist, replacing the stored document
    pub async fn save(&self, wishlist: &Wishlist) -> RepoResult<Wishlist> {
        match &wishlist.id {
            Some(rid) => {
                let data = content_without_id(wishlist)?;
                let mut result = self
                    .base
                    .db()
                    .query("UPDATE $id CONTENT $data RETURN AFTER")
                    .bind(("id", rid.clone()))
                    .bind(("data", data))
                    .await?;
                let wishlists: Vec<Wishlist> = result.take(0)?;
                wishlists
                    .into_iter()
                    .next()
                    .ok_or_else(|| RepoError::NotFound("Wishlist not found".to_string()))
            }
            None => {
                let created: Option<Wishlist> =
                    self.base.db().create(TABLE).content(wishlist.clone()).await?;
                created.ok_or_else(|| RepoError::Database("Failed to save wishlist".to_string()))
            }
        }
    }

    /// Delete a wishlist document (used after a guest merge)
    pub async fn delete(&self, wishlist: &Wishlist) -> RepoResult<()> {
        if let Some(rid) = &wishlist.id {
            let _: Option<Wishlist> = self.base.db().delete(rid.clone()).await?;
        }
        Ok(())
    }
}
