//! Product Model
//!
//! A product's category-specific attributes are a tagged union serialized
//! into the product row, so a product always has exactly one attribute
//! payload and it always matches the category. The category is fixed at
//! creation; no update path touches it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product category (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Category {
    Apparel,
    Bag,
    Book,
}

/// Category-specific attributes, tagged by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum CategoryAttrs {
    Apparel {
        size: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    Bag {
        #[serde(skip_serializing_if = "Option::is_none")]
        capacity_liters: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        material: Option<String>,
    },
    Book {
        author: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        isbn: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pages: Option<i64>,
    },
}

impl CategoryAttrs {
    /// The category this payload belongs to
    pub fn category(&self) -> Category {
        match self {
            CategoryAttrs::Apparel { .. } => Category::Apparel,
            CategoryAttrs::Bag { .. } => Category::Bag,
            CategoryAttrs::Book { .. } => Category::Book,
        }
    }
}

/// Product catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub category: Category,
    #[sqlx(json)]
    pub attributes: CategoryAttrs,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create product payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub attributes: CategoryAttrs,
}
