//! Review Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Moderation status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for ReviewStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Product review; one per (user, product)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Author user id ("user:xyz")
    pub user: String,
    /// Author display name, denormalized for listing
    #[serde(default)]
    pub user_name: String,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub helpful: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCreate {
    pub product_id: String,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewStatusUpdate {
    pub status: ReviewStatus,
}
