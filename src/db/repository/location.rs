//! Location Repository

use sqlx::SqlitePool;
use uuid::Uuid;

use super::{RepoResult, constraint_error};
use crate::db::models::{Location, LocationCreate};

#[derive(Clone)]
pub struct LocationRepository {
    pool: SqlitePool,
}

impl LocationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find location by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Location>> {
        let location = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(location)
    }

    /// Create a new location (address is unique)
    pub async fn create(&self, data: LocationCreate) -> RepoResult<Location> {
        let location = Location {
            id: Uuid::new_v4().to_string(),
            address: data.address,
        };

        sqlx::query("INSERT INTO locations (id, address) VALUES (?, ?)")
            .bind(&location.id)
            .bind(&location.address)
            .execute(&self.pool)
            .await
            .map_err(|e| constraint_error(e, "address", "location"))?;

        Ok(location)
    }
}
