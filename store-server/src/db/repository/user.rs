//! User Repository

use super::{BaseRepository, CountRow, Page, RepoError, RepoResult, make_record_id};
use crate::db::models::User;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by email (unique)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let rid = make_record_id(TABLE, id);
        let user: Option<User> = self.base.db().select(rid).await?;
        Ok(user)
    }

    /// Create a new user; rejects duplicate email
    pub async fn create(&self, user: User) -> RepoResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User '{}' already exists",
                user.email
            )));
        }

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// List users, newest first (admin)
    pub async fn find_page(&self, page: i64, limit: i64) -> RepoResult<Page<User>> {
        let start = (page - 1).max(0) * limit;
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY created_at DESC LIMIT $limit START $start")
            .bind(("limit", limit))
            .bind(("start", start))
            .await?
            .take(0)?;

        let counts: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS count FROM user GROUP ALL")
            .await?
            .take(0)?;
        let total = counts.first().map(|c| c.count).unwrap_or(0);

        Ok(Page {
            items: users,
            total,
        })
    }

    /// Change a user's role (admin)
    pub async fn update_role(&self, id: &str, role: &str) -> RepoResult<User> {
        let rid = make_record_id(TABLE, id);
        let role_owned = role.to_string();
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET role = $role RETURN AFTER")
            .bind(("id", rid))
            .bind(("role", role_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Hard delete a user (admin)
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = make_record_id(TABLE, id);
        let deleted: Option<User> = self.base.db().delete(rid).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }
}
