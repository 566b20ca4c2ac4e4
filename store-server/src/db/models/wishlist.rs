//! Wishlist Model
//!
//! 商品引用集合；游客心愿单在登录后并入用户心愿单。

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Wishlist keyed by user id or guest id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wishlist {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// User id ("user:xyz") or opaque guest id
    pub user: String,
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub products: Vec<RecordId>,
    #[serde(default)]
    pub is_guest: bool,
}

impl Wishlist {
    pub fn new(user: impl Into<String>, is_guest: bool) -> Self {
        Self {
            id: None,
            user: user.into(),
            products: Vec::new(),
            is_guest,
        }
    }

    /// Add with set semantics; returns false when already present
    pub fn add_product(&mut self, product: RecordId) -> bool {
        if self.products.contains(&product) {
            return false;
        }
        self.products.push(product);
        true
    }

    pub fn remove_product(&mut self, product: &RecordId) {
        self.products.retain(|p| p != product);
    }

    /// Union another wishlist's products into this one, de-duplicated
    pub fn merge_from(&mut self, other: &Wishlist) {
        for product in &other.products {
            if !self.products.contains(product) {
                self.products.push(product.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_id(key: &str) -> RecordId {
        RecordId::from_table_key("product", key)
    }

    #[test]
    fn test_add_is_set_like() {
        let mut wishlist = Wishlist::new("user:1", false);
        assert!(wishlist.add_product(product_id("a")));
        assert!(!wishlist.add_product(product_id("a")));
        assert_eq!(wishlist.products.len(), 1);
    }

    #[test]
    fn test_merge_deduplicates() {
        let mut user_list = Wishlist::new("user:1", false);
        user_list.add_product(product_id("a"));
        user_list.add_product(product_id("b"));

        let mut guest_list = Wishlist::new("guest-123", true);
        guest_list.add_product(product_id("b"));
        guest_list.add_product(product_id("c"));

        user_list.merge_from(&guest_list);
        assert_eq!(user_list.products.len(), 3);
    }
}
