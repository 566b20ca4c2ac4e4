//! Product Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Price with currency (amounts in major units)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPrice {
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Stock levels
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductInventory {
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub reserved: i32,
}

/// Product image reference (stored as external URL)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Aggregated review statistics, denormalized onto the product
/// for the storefront listing page
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ReviewStats {
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_reviews: i64,
    /// Count of 1..5 star reviews, index 0 = 1 star
    #[serde(default)]
    pub rating_distribution: [i64; 5],
}

/// Recompute review statistics from scratch
///
/// 平均分保留两位小数，与货币金额同样的精度策略
pub fn compute_review_stats(ratings: &[i32]) -> ReviewStats {
    let mut distribution = [0i64; 5];
    for r in ratings {
        if (1..=5).contains(r) {
            distribution[(*r - 1) as usize] += 1;
        }
    }
    let total: i64 = distribution.iter().sum();
    let average = if total == 0 {
        0.0
    } else {
        let sum: i64 = distribution
            .iter()
            .enumerate()
            .map(|(i, count)| (i as i64 + 1) * count)
            .sum();
        (sum as f64 * 100.0 / total as f64).round() / 100.0
    };
    ReviewStats {
        average_rating: average,
        total_reviews: total,
        rating_distribution: distribution,
    }
}

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub price: ProductPrice,
    #[serde(default)]
    pub inventory: ProductInventory,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub review_stats: ReviewStats,
    pub created_at: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub categories: Option<Vec<String>>,
    pub price: ProductPrice,
    pub inventory: Option<ProductInventory>,
    pub images: Option<Vec<ProductImage>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<ProductPrice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<ProductInventory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ProductImage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_stats_empty() {
        let stats = compute_review_stats(&[]);
        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.average_rating, 0.0);
    }

    #[test]
    fn test_review_stats_distribution() {
        let stats = compute_review_stats(&[5, 4, 4, 1]);
        assert_eq!(stats.total_reviews, 4);
        assert_eq!(stats.rating_distribution, [1, 0, 0, 2, 1]);
        assert_eq!(stats.average_rating, 3.5);
    }

    #[test]
    fn test_review_stats_rounding() {
        // (5 + 4 + 4) / 3 = 4.333... -> 4.33
        let stats = compute_review_stats(&[5, 4, 4]);
        assert_eq!(stats.average_rating, 4.33);
    }

    #[test]
    fn test_review_stats_ignores_out_of_range() {
        let stats = compute_review_stats(&[3, 0, 6]);
        assert_eq!(stats.total_reviews, 1);
        assert_eq!(stats.average_rating, 3.0);
    }
}
