//! Stockroom - retail stock and sales management REST API
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── core/     # configuration, state, server
//! ├── auth/     # JWT, sessions, roles, middleware
//! ├── api/      # HTTP routes and handlers
//! ├── db/       # SQLite pool, models, repositories
//! └── utils/    # errors, logging
//! ```
//!
//! The two consistency-critical paths — sale creation (stock decrements)
//! and refresh-token rotation — run their read-check-write sequences
//! inside `BEGIN IMMEDIATE` database transactions; there is no
//! application-level locking.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService, Role, SessionService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Security logging macro - structured tracing with a fixed target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr $(, $key:ident = $value:expr)*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event
            $(, $key = $value)*
        );
    };
}
