//! Product Repository

use super::{BaseRepository, CountRow, Page, RepoError, RepoResult, make_record_id};
use crate::db::models::{Product, ProductCreate, ProductUpdate, ReviewStats};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "product";

/// Storefront / admin listing filters
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    /// Case-insensitive substring match over the product name
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Storefront listings only show active products; admin passes false
    pub active_only: bool,
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let rid = make_record_id(TABLE, id);
        let product: Option<Product> = self.base.db().select(rid).await?;
        Ok(product)
    }

    /// Find product by sku
    pub async fn find_by_sku(&self, sku: &str) -> RepoResult<Option<Product>> {
        let sku_owned = sku.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE sku = $sku LIMIT 1")
            .bind(("sku", sku_owned))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    fn where_clause(filter: &ProductFilter) -> String {
        let mut conditions: Vec<&str> = Vec::new();
        if filter.active_only {
            conditions.push("is_active = true");
        }
        if filter.search.is_some() {
            conditions.push("string::contains(string::lowercase(name), $search)");
        }
        if filter.category.is_some() {
            conditions.push("$category IN categories");
        }
        if filter.min_price.is_some() {
            conditions.push("price.amount >= $min_price");
        }
        if filter.max_price.is_some() {
            conditions.push("price.amount <= $max_price");
        }
        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }

    /// Paginated product listing with filters
    pub async fn find_page(
        &self,
        filter: &ProductFilter,
        page: i64,
        limit: i64,
    ) -> RepoResult<Page<Product>> {
        let start = (page - 1).max(0) * limit;
        let where_clause = Self::where_clause(filter);

        let list_query = format!(
            "SELECT * FROM product{where_clause} ORDER BY created_at DESC LIMIT $limit START $start"
        );
        let mut query = self
            .base
            .db()
            .query(&list_query)
            .bind(("limit", limit))
            .bind(("start", start));
        if let Some(search) = &filter.search {
            query = query.bind(("search", search.to_lowercase()));
        }
        if let Some(category) = &filter.category {
            query = query.bind(("category", category.clone()));
        }
        if let Some(min_price) = filter.min_price {
            query = query.bind(("min_price", min_price));
        }
        if let Some(max_price) = filter.max_price {
            query = query.bind(("max_price", max_price));
        }
        let products: Vec<Product> = query.await?.take(0)?;

        let count_query = format!("SELECT count() AS count FROM product{where_clause} GROUP ALL");
        let mut query = self.base.db().query(&count_query);
        if let Some(search) = &filter.search {
            query = query.bind(("search", search.to_lowercase()));
        }
        if let Some(category) = &filter.category {
            query = query.bind(("category", category.clone()));
        }
        if let Some(min_price) = filter.min_price {
            query = query.bind(("min_price", min_price));
        }
        if let Some(max_price) = filter.max_price {
            query = query.bind(("max_price", max_price));
        }
        let counts: Vec<CountRow> = query.await?.take(0)?;
        let total = counts.first().map(|c| c.count).unwrap_or(0);

        Ok(Page {
            items: products,
            total,
        })
    }

    /// Create a new product (admin)
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        // 校验 sku 唯一
        if self.find_by_sku(&data.sku).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Product with sku '{}' already exists",
                data.sku
            )));
        }

        let product = Product {
            id: None,
            sku: data.sku,
            name: data.name,
            description: data.description.unwrap_or_default(),
            categories: data.categories.unwrap_or_default(),
            price: data.price,
            inventory: data.inventory.unwrap_or_default(),
            images: data.images.unwrap_or_default(),
            tags: data.tags.unwrap_or_default(),
            is_active: true,
            review_stats: ReviewStats::default(),
            created_at: Utc::now().to_rfc3339(),
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product (admin)
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let rid = make_record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $id MERGE $data RETURN AFTER")
            .bind(("id", rid))
            .bind(("data", data))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product (admin)
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = make_record_id(TABLE, id);
        let deleted: Option<Product> = self.base.db().delete(rid).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }

    /// Replace the denormalized review statistics block
    pub async fn set_review_stats(&self, id: &str, stats: ReviewStats) -> RepoResult<()> {
        let rid = make_record_id(TABLE, id);
        self.base
            .db()
            .query("UPDATE $id SET review_stats = $stats")
            .bind(("id", rid))
            .bind(("stats", stats))
            .await?;
        Ok(())
    }
}
