//! Order Repository

use super::{BaseRepository, CountRow, Page, RepoError, RepoResult, make_record_id};
use crate::db::models::{Order, OrderPaymentUpdate, OrderStatusUpdate, PaymentStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

/// Admin listing filters
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub min_total: Option<f64>,
    pub max_total: Option<f64>,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order snapshot
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = make_record_id(TABLE, id);
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    /// Find the order created for a payment-gateway order id
    pub async fn find_by_gateway_order_id(&self, gateway_order_id: &str) -> RepoResult<Option<Order>> {
        let gid = gateway_order_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE gateway_order_id = $gid LIMIT 1")
            .bind(("gid", gid))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// User's order history, newest first
    pub async fn find_by_user(&self, user: &str) -> RepoResult<Vec<Order>> {
        let user_owned = user.to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user_owned))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Paginated admin listing with filters
    pub async fn find_page(
        &self,
        filter: &OrderFilter,
        page: i64,
        limit: i64,
    ) -> RepoResult<Page<Order>> {
        let start = (page - 1).max(0) * limit;

        let mut conditions: Vec<&str> = Vec::new();
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        if filter.payment_status.is_some() {
            conditions.push("payment_status = $payment_status");
        }
        if filter.min_total.is_some() {
            conditions.push("total >= $min_total");
        }
        if filter.max_total.is_some() {
            conditions.push("total <= $max_total");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let list_query = format!(
            "SELECT * FROM order{where_clause} ORDER BY created_at DESC LIMIT $limit START $start"
        );
        let mut query = self
            .base
            .db()
            .query(&list_query)
            .bind(("limit", limit))
            .bind(("start", start));
        if let Some(status) = &filter.status {
            query = query.bind(("status", status.clone()));
        }
        if let Some(payment_status) = &filter.payment_status {
            query = query.bind(("payment_status", payment_status.clone()));
        }
        if let Some(min_total) = filter.min_total {
            query = query.bind(("min_total", min_total));
        }
        if let Some(max_total) = filter.max_total {
            query = query.bind(("max_total", max_total));
        }
        let orders: Vec<Order> = query.await?.take(0)?;

        let count_query = format!("SELECT count() AS count FROM order{where_clause} GROUP ALL");
        let mut query = self.base.db().query(&count_query);
        if let Some(status) = &filter.status {
            query = query.bind(("status", status.clone()));
        }
        if let Some(payment_status) = &filter.payment_status {
            query = query.bind(("payment_status", payment_status.clone()));
        }
        if let Some(min_total) = filter.min_total {
            query = query.bind(("min_total", min_total));
        }
        if let Some(max_total) = filter.max_total {
            query = query.bind(("max_total", max_total));
        }
        let counts: Vec<CountRow> = query.await?.take(0)?;
        let total = counts.first().map(|c| c.count).unwrap_or(0);

        Ok(Page {
            items: orders,
            total,
        })
    }

    /// Partial status update (admin). Any value may overwrite any other;
    /// there is no transition guard here.
    pub async fn update_status(&self, id: &str, data: OrderStatusUpdate) -> RepoResult<Order> {
        let rid = make_record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $id MERGE $data RETURN AFTER")
            .bind(("id", rid))
            .bind(("data", data))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Record a confirmed payment: Processing/Paid plus the gateway identifiers
    pub async fn mark_paid(
        &self,
        id: &str,
        gateway_payment_id: &str,
        gateway_signature: &str,
    ) -> RepoResult<Order> {
        let rid = make_record_id(TABLE, id);
        let payment_id = gateway_payment_id.to_string();
        let signature = gateway_signature.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET status = 'Processing', payment_status = 'Paid', \
                 gateway_payment_id = $payment_id, gateway_signature = $signature RETURN AFTER",
            )
            .bind(("id", rid))
            .bind(("payment_id", payment_id))
            .bind(("signature", signature))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Manual payment-details entry (admin)
    pub async fn update_payment(&self, id: &str, data: OrderPaymentUpdate) -> RepoResult<Order> {
        let rid = make_record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET gateway_order_id = $gateway_order_id, \
                 gateway_payment_id = $gateway_payment_id, \
                 gateway_signature = $gateway_signature, \
                 payment_status = $payment_status RETURN AFTER",
            )
            .bind(("id", rid))
            .bind(("gateway_order_id", data.gateway_order_id))
            .bind(("gateway_payment_id", data.gateway_payment_id))
            .bind(("gateway_signature", data.gateway_signature))
            .bind(("payment_status", PaymentStatus::Paid))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Hard delete an order (admin). No cascading cleanup of cart or inventory.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = make_record_id(TABLE, id);
        let deleted: Option<Order> = self.base.db().delete(rid).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Order {} not found", id)));
        }
        Ok(())
    }
}
