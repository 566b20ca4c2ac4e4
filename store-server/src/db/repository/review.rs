//! Review Repository

use super::{BaseRepository, CountRow, Page, RepoError, RepoResult, make_record_id};
use crate::db::models::{Review, ReviewStatus};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "review";

/// 店面评论列表只展示 3 星及以上 (原有行为，保留)
pub const MIN_PUBLIC_RATING: i32 = 3;

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find review by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Review>> {
        let rid = make_record_id(TABLE, id);
        let review: Option<Review> = self.base.db().select(rid).await?;
        Ok(review)
    }

    /// Find the review a user wrote for a product
    pub async fn find_by_user_and_product(
        &self,
        user: &str,
        product: &RecordId,
    ) -> RepoResult<Option<Review>> {
        let user_owned = user.to_string();
        let product_str = product.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM review WHERE user = $user AND product = $product LIMIT 1")
            .bind(("user", user_owned))
            .bind(("product", product_str))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        Ok(reviews.into_iter().next())
    }

    /// Create a review; one per (user, product)
    pub async fn create(&self, review: Review) -> RepoResult<Review> {
        if self
            .find_by_user_and_product(&review.user, &review.product)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(
                "You have already reviewed this product".to_string(),
            ));
        }

        let created: Option<Review> = self.base.db().create(TABLE).content(review).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }

    /// Public listing for a product page: approved + pending, rating >= 3,
    /// newest first, paginated
    pub async fn find_public_page(
        &self,
        product: &RecordId,
        page: i64,
        limit: i64,
    ) -> RepoResult<Page<Review>> {
        let start = (page - 1).max(0) * limit;
        let product_str = product.to_string();

        let reviews: Vec<Review> = self
            .base
            .db()
            .query(
                "SELECT * FROM review WHERE product = $product AND status != 'rejected' \
                 AND rating >= $min_rating ORDER BY created_at DESC LIMIT $limit START $start",
            )
            .bind(("product", product_str.clone()))
            .bind(("min_rating", MIN_PUBLIC_RATING))
            .bind(("limit", limit))
            .bind(("start", start))
            .await?
            .take(0)?;

        let counts: Vec<CountRow> = self
            .base
            .db()
            .query(
                "SELECT count() AS count FROM review WHERE product = $product \
                 AND status != 'rejected' AND rating >= $min_rating GROUP ALL",
            )
            .bind(("product", product_str))
            .bind(("min_rating", MIN_PUBLIC_RATING))
            .await?
            .take(0)?;
        let total = counts.first().map(|c| c.count).unwrap_or(0);

        Ok(Page {
            items: reviews,
            total,
        })
    }

    /// Admin listing, optionally filtered by moderation status
    pub async fn find_page(
        &self,
        status: Option<ReviewStatus>,
        page: i64,
        limit: i64,
    ) -> RepoResult<Page<Review>> {
        let start = (page - 1).max(0) * limit;
        let where_clause = if status.is_some() {
            " WHERE status = $status"
        } else {
            ""
        };

        let list_query = format!(
            "SELECT * FROM review{where_clause} ORDER BY created_at DESC LIMIT $limit START $start"
        );
        let mut query = self
            .base
            .db()
            .query(&list_query)
            .bind(("limit", limit))
            .bind(("start", start));
        if let Some(status) = status {
            query = query.bind(("status", status));
        }
        let reviews: Vec<Review> = query.await?.take(0)?;

        let count_query = format!("SELECT count() AS count FROM review{where_clause} GROUP ALL");
        let mut query = self.base.db().query(&count_query);
        if let Some(status) = status {
            query = query.bind(("status", status));
        }
        let counts: Vec<CountRow> = query.await?.take(0)?;
        let total = counts.first().map(|c| c.count).unwrap_or(0);

        Ok(Page {
            items: reviews,
            total,
        })
    }

    /// All non-rejected ratings for a product, for recomputing its stats
    pub async fn ratings_for_product(&self, product: &RecordId) -> RepoResult<Vec<i32>> {
        let product_str = product.to_string();

        #[derive(serde::Deserialize)]
        struct RatingRow {
            rating: i32,
        }

        let rows: Vec<RatingRow> = self
            .base
            .db()
            .query("SELECT rating FROM review WHERE product = $product AND status != 'rejected'")
            .bind(("product", product_str))
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(|r| r.rating).collect())
    }

    /// Update moderation status (admin)
    pub async fn update_status(&self, id: &str, status: ReviewStatus) -> RepoResult<Review> {
        let rid = make_record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET status = $status RETURN AFTER")
            .bind(("id", rid))
            .bind(("status", status))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        reviews
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))
    }

    /// Increment the helpful counter atomically in the database
    pub async fn increment_helpful(&self, id: &str) -> RepoResult<Review> {
        let rid = make_record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET helpful += 1 RETURN AFTER")
            .bind(("id", rid))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        reviews
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))
    }

    /// Hard delete a review (admin)
    pub async fn delete(&self, id: &str) -> RepoResult<Review> {
        let rid = make_record_id(TABLE, id);
        let deleted: Option<Review> = self.base.db().delete(rid).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))
    }
}
