//! Location Model

use serde::{Deserialize, Serialize};

/// Store location
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Location {
    pub id: String,
    pub address: String,
}

/// Create location payload
#[derive(Debug, Clone, Deserialize)]
pub struct LocationCreate {
    pub address: String,
}
