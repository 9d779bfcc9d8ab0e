//! Stock Model

use serde::{Deserialize, Serialize};

/// Available units of one product at one location
///
/// Quantity is never negative; a decrement below zero is rejected before
/// any write.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub product_id: String,
    pub location_id: String,
    pub quantity: i64,
}

/// Absolute quantity to set for one location in a bulk stock update
#[derive(Debug, Clone)]
pub struct StockLevel {
    pub location_id: String,
    pub quantity: i64,
}
