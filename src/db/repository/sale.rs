//! Sale Repository
//!
//! The sale-creation transaction: validate requested quantities against
//! current stock at the target location, then atomically decrement stock
//! and record the sale — or finish with zero writes.

use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};

use super::{RepoError, RepoResult, stock};
use crate::db::models::{Sale, SaleItem, SaleLine};

#[derive(Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a sale, decrementing stock for every requested item.
    ///
    /// Duplicate products in the request are rejected before any storage
    /// access. Inside a `BEGIN IMMEDIATE` transaction, all matching stock
    /// rows are read in one query; if any item has no row or not enough
    /// quantity, the transaction finishes with zero writes and the whole
    /// request is rejected — no partial application. The error does not say
    /// which item failed.
    pub async fn create(
        &self,
        seller_id: &str,
        location_id: &str,
        lines: &[SaleLine],
    ) -> RepoResult<Sale> {
        if lines.is_empty() {
            return Err(RepoError::Validation(
                "sale must contain at least one item".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for line in lines {
            if !seen.insert(line.product_id.as_str()) {
                return Err(RepoError::Validation(format!(
                    "duplicate product in request: {}",
                    line.product_id
                )));
            }
            if line.quantity < 1 {
                return Err(RepoError::Validation(
                    "item quantity must be at least 1".to_string(),
                ));
            }
        }

        let product_ids: Vec<&str> = lines.iter().map(|l| l.product_id.as_str()).collect();

        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let current = stock::fetch_levels_on(&mut tx, location_id, &product_ids).await?;
        let available: HashMap<&str, i64> = current
            .iter()
            .map(|s| (s.product_id.as_str(), s.quantity))
            .collect();

        let mut decrements = Vec::with_capacity(lines.len());
        for line in lines {
            match available.get(line.product_id.as_str()) {
                Some(&quantity) if quantity >= line.quantity => {
                    decrements.push((line.product_id.as_str(), quantity - line.quantity));
                }
                _ => {
                    // clean finish with zero writes; the caller raises the
                    // conflict after the transaction closes
                    tx.commit().await?;
                    return Err(RepoError::InsufficientStock);
                }
            }
        }

        let sale = Sale::new(seller_id, location_id);
        sqlx::query(
            r#"INSERT INTO sales (id, seller_id, location_id, status, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&sale.id)
        .bind(&sale.seller_id)
        .bind(&sale.location_id)
        .bind(sale.status)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query("INSERT INTO sale_items (sale_id, product_id, quantity) VALUES (?, ?, ?)")
                .bind(&sale.id)
                .bind(&line.product_id)
                .bind(line.quantity)
                .execute(&mut *tx)
                .await?;
        }

        for (product_id, remaining) in decrements {
            stock::upsert_level_on(&mut tx, product_id, location_id, remaining).await?;
        }

        tx.commit().await?;

        tracing::info!(
            sale_id = %sale.id,
            seller_id = %seller_id,
            location_id = %location_id,
            items = lines.len(),
            "Sale recorded"
        );
        Ok(sale)
    }

    /// Find a sale and its items
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<(Sale, Vec<SaleItem>)>> {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(sale) = sale else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, SaleItem>("SELECT * FROM sale_items WHERE sale_id = ?")
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some((sale, items)))
    }
}
