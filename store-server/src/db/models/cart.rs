//! Cart Model (aggregate)
//!
//! 购物车是唯一带行为的模型：小计/折扣/总价永远由行项重算，
//! 不信任客户端提交的金额。

use chrono::Utc;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use crate::checkout::money;

/// A single cart line with its unit-price snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    #[serde(default)]
    pub name: String,
    /// Unit price snapshot taken when the line was added
    pub price: f64,
    pub quantity: i32,
}

/// Shopping cart; one per user, created lazily on first access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Owning user id ("user:xyz")
    pub user: String,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub total: f64,
    pub updated_at: String,
}

impl Cart {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            id: None,
            user: user.into(),
            items: Vec::new(),
            subtotal: 0.0,
            discount: 0.0,
            total: 0.0,
            updated_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a line, merging quantity into an existing line for the same product
    pub fn add_item(&mut self, product: RecordId, name: &str, unit_price: f64, quantity: i32) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.product == product) {
            existing.quantity += quantity;
        } else {
            self.items.push(CartItem {
                product,
                name: name.to_string(),
                price: unit_price,
                quantity,
            });
        }
        self.recalculate();
    }

    /// Remove the line for a product (no-op when absent, matching the API contract)
    pub fn remove_item(&mut self, product: &RecordId) {
        self.items.retain(|i| &i.product != product);
        self.recalculate();
    }

    /// Set the quantity of an existing line; returns false when the line is absent
    pub fn set_quantity(&mut self, product: &RecordId, quantity: i32) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| &i.product == product) else {
            return false;
        };
        item.quantity = quantity;
        self.recalculate();
        true
    }

    /// Apply an absolute discount, clamped to the subtotal. Returns the new total.
    pub fn apply_discount(&mut self, amount: f64) -> f64 {
        self.discount = amount.min(self.subtotal);
        self.recalculate();
        self.total
    }

    /// Empty the cart and zero all totals
    pub fn clear(&mut self) {
        self.items.clear();
        self.discount = 0.0;
        self.recalculate();
    }

    /// Recompute subtotal/total from the line items
    ///
    /// 每次变更后调用；折扣同时收敛到 [0, subtotal] 区间，
    /// 保证 total = subtotal - discount 恒成立。
    pub fn recalculate(&mut self) {
        self.subtotal = money::sum(self.items.iter().map(|i| money::line_total(i.price, i.quantity)));
        self.discount = self.discount.clamp(0.0, self.subtotal);
        self.total = money::sub(self.subtotal, self.discount);
        self.updated_at = Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_id(key: &str) -> RecordId {
        RecordId::from_table_key("product", key)
    }

    #[test]
    fn test_add_item_merges_lines() {
        let mut cart = Cart::new("user:1");
        cart.add_item(product_id("a"), "Wardrobe", 100.0, 2);
        cart.add_item(product_id("a"), "Wardrobe", 100.0, 3);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.subtotal, 500.0);
        assert_eq!(cart.total, 500.0);
    }

    #[test]
    fn test_totals_recomputed_after_every_mutation() {
        let mut cart = Cart::new("user:1");
        cart.add_item(product_id("a"), "Wardrobe", 100.0, 2);
        cart.add_item(product_id("b"), "Shelf", 50.0, 1);
        assert_eq!(cart.subtotal, 250.0);

        assert!(cart.set_quantity(&product_id("b"), 4));
        assert_eq!(cart.subtotal, 400.0);

        cart.remove_item(&product_id("a"));
        assert_eq!(cart.subtotal, 200.0);
        assert_eq!(cart.total, 200.0);
    }

    #[test]
    fn test_set_quantity_missing_line() {
        let mut cart = Cart::new("user:1");
        assert!(!cart.set_quantity(&product_id("missing"), 2));
    }

    #[test]
    fn test_discount_clamped_to_subtotal() {
        let mut cart = Cart::new("user:1");
        cart.add_item(product_id("a"), "Wardrobe", 100.0, 1);

        let total = cart.apply_discount(150.0);
        assert_eq!(cart.discount, 100.0);
        assert_eq!(total, 0.0);
    }

    #[test]
    fn test_discount_reclamped_when_items_removed() {
        let mut cart = Cart::new("user:1");
        cart.add_item(product_id("a"), "Wardrobe", 100.0, 2);
        cart.add_item(product_id("b"), "Shelf", 50.0, 1);
        cart.apply_discount(220.0);
        assert_eq!(cart.discount, 220.0);

        cart.remove_item(&product_id("a"));
        // Subtotal dropped to 50, discount must follow
        assert_eq!(cart.discount, 50.0);
        assert_eq!(cart.total, 0.0);
    }

    #[test]
    fn test_clear_zeroes_everything() {
        let mut cart = Cart::new("user:1");
        cart.add_item(product_id("a"), "Wardrobe", 100.0, 2);
        cart.apply_discount(30.0);
        cart.clear();

        assert!(cart.items.is_empty());
        assert_eq!(cart.subtotal, 0.0);
        assert_eq!(cart.discount, 0.0);
        assert_eq!(cart.total, 0.0);
    }

    #[test]
    fn test_spec_scenario_totals() {
        // [{A, 100, qty 2}, {B, 50, qty 1}] -> subtotal 250, discount 30 -> 220
        let mut cart = Cart::new("user:1");
        cart.add_item(product_id("a"), "A", 100.0, 2);
        cart.add_item(product_id("b"), "B", 50.0, 1);
        assert_eq!(cart.subtotal, 250.0);

        let total = cart.apply_discount(30.0);
        assert_eq!(total, 220.0);
    }
}
