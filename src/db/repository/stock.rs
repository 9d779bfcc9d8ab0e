//! Stock Repository
//!
//! Per (product, location) quantity counters. The bulk update sets
//! absolute quantities; only the sale engine decrements. Both share the
//! same fetch/upsert statements, executed on an open transaction.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashSet;

use super::{RepoError, RepoResult, constraint_error};
use crate::db::models::{Stock, StockLevel};

#[derive(Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Current stock level for one (product, location) pair
    pub async fn level(&self, product_id: &str, location_id: &str) -> RepoResult<Option<Stock>> {
        let stock = sqlx::query_as::<_, Stock>(
            "SELECT * FROM stock WHERE product_id = ? AND location_id = ?",
        )
        .bind(product_id)
        .bind(location_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(stock)
    }

    /// Set absolute stock quantities for one product across locations.
    ///
    /// Rejects duplicate locations in the request before touching storage.
    /// Inside the transaction: the product must exist (NotFound otherwise,
    /// finishing with zero writes); an unknown location surfaces as a
    /// foreign-key conflict.
    pub async fn bulk_set(&self, product_id: &str, updates: &[StockLevel]) -> RepoResult<()> {
        let mut seen = HashSet::new();
        for update in updates {
            if !seen.insert(update.location_id.as_str()) {
                return Err(RepoError::Validation(format!(
                    "duplicate location in request: {}",
                    update.location_id
                )));
            }
            if update.quantity < 0 {
                return Err(RepoError::Validation(
                    "stock quantity must not be negative".to_string(),
                ));
            }
        }

        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let product_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE id = ?",
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?
            > 0;

        if !product_exists {
            tx.commit().await?;
            return Err(RepoError::NotFound(format!("product {product_id}")));
        }

        for update in updates {
            upsert_level_on(&mut tx, product_id, &update.location_id, update.quantity)
                .await
                .map_err(|e| constraint_error(e, "stock", "location"))?;
        }

        tx.commit().await?;

        tracing::info!(
            product_id = %product_id,
            locations = updates.len(),
            "Stock levels updated"
        );
        Ok(())
    }
}

// ===== statements shared with the sale engine =====

/// Fetch the stock rows for a set of products at one location, in one query
pub(crate) async fn fetch_levels_on(
    conn: &mut SqliteConnection,
    location_id: &str,
    product_ids: &[&str],
) -> RepoResult<Vec<Stock>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT product_id, location_id, quantity FROM stock WHERE location_id = ",
    );
    qb.push_bind(location_id);
    qb.push(" AND product_id IN (");
    let mut separated = qb.separated(", ");
    for id in product_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let rows = qb.build_query_as::<Stock>().fetch_all(conn).await?;
    Ok(rows)
}

/// Upsert one stock row's quantity (absolute set)
pub(crate) async fn upsert_level_on(
    conn: &mut SqliteConnection,
    product_id: &str,
    location_id: &str,
    quantity: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO stock (product_id, location_id, quantity)
            VALUES (?, ?, ?)
            ON CONFLICT (product_id, location_id) DO UPDATE SET quantity = excluded.quantity"#,
    )
    .bind(product_id)
    .bind(location_id)
    .bind(quantity)
    .execute(conn)
    .await?;
    Ok(())
}
