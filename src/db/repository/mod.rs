//! Repository Module
//!
//! CRUD and transaction logic per table. The sale engine and the session
//! engine run their read-check-write sequences inside `BEGIN IMMEDIATE`
//! transactions: SQLite takes the write lock up front, so two competing
//! transactions on the same rows serialize instead of racing.

pub mod location;
pub mod product;
pub mod sale;
pub mod stock;
pub mod user;

pub use location::LocationRepository;
pub use product::ProductRepository;
pub use sale::SaleRepository;
pub use stock::StockRepository;
pub use user::UserRepository;

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("not found: {0}")]
    NotFound(String),

    /// Unique-constraint violation, tagged with the logical field name
    #[error("duplicate {0}")]
    Duplicate(String),

    /// Foreign-key violation, tagged with the logical field name
    #[error("unknown {0}")]
    ForeignKey(String),

    /// A requested product has no stock row at the location, or too little.
    /// Deliberately does not say which item failed.
    #[error("insufficient stock")]
    InsufficientStock,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Translate a storage error into a constraint-specific error.
///
/// `unique` and `foreign` name the logical fields a violation maps to, so
/// internal column names never reach the client.
pub(crate) fn constraint_error(err: sqlx::Error, unique: &str, foreign: &str) -> RepoError {
    if let sqlx::Error::Database(db) = &err {
        match db.kind() {
            ErrorKind::UniqueViolation => return RepoError::Duplicate(unique.to_string()),
            ErrorKind::ForeignKeyViolation => return RepoError::ForeignKey(foreign.to_string()),
            _ => {}
        }
    }
    RepoError::Database(err.to_string())
}
