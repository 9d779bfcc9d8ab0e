//! Utility module - shared error types, extraction, and logging

pub mod error;
pub mod extract;
pub mod logger;

pub use error::{ApiResponse, AppError, AppResult, ErrorBody};
pub use error::{created, ok};
pub use extract::Json;
