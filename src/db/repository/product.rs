//! Product Repository

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate};

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    /// Create a new product
    ///
    /// The category is derived from the attribute payload, so the two can
    /// never disagree; it is immutable afterwards.
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.price_cents < 0 {
            return Err(RepoError::Validation("price must not be negative".to_string()));
        }

        let attributes_json = serde_json::to_string(&data.attributes)
            .map_err(|e| RepoError::Database(format!("failed to serialize attributes: {e}")))?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            description: data.description.unwrap_or_default(),
            price_cents: data.price_cents,
            category: data.attributes.category(),
            attributes: data.attributes,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO products
                (id, name, description, price_cents, category, attributes, is_active,
                 created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.category)
        .bind(attributes_json)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }
}
