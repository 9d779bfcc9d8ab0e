//! Sale Model
//!
//! A sale and its items are created atomically as a unit and never
//! mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sale status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SaleStatus {
    Completed,
}

/// Sale record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub seller_id: String,
    pub location_id: String,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// New completed sale with a fresh id and current timestamps
    pub fn new(seller_id: &str, location_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            seller_id: seller_id.to_string(),
            location_id: location_id.to_string(),
            status: SaleStatus::Completed,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One line of a committed sale
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
}

/// Requested (product, quantity) pair for a new sale
#[derive(Debug, Clone)]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: i64,
}
