//! Server Configuration
//!
//! Every field can be overridden through an environment variable:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | HTTP_PORT | 3000 | HTTP listen port |
//! | DATABASE_PATH | stockroom.db | SQLite database file |
//! | JWT_SECRET | generated | access-token signing key |
//! | JWT_ACCESS_TTL_MINUTES | 15 | signed access-token expiry |
//! | REFRESH_TTL_SECONDS | 1209600 | refresh-token and cookie lifetime |
//! | COOKIE_SECURE | true | set the Secure attribute on cookies |
//! | ADMIN_USERNAME | admin | bootstrap admin username |
//! | ADMIN_PASSWORD | changeme | bootstrap admin password |
//! | ENVIRONMENT | development | development / staging / production |

use crate::auth::JwtConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API listen port
    pub http_port: u16,
    /// SQLite database file path
    pub database_path: String,
    /// JWT signing configuration
    pub jwt: JwtConfig,
    /// Refresh-token TTL in seconds; also the max-age of both session
    /// cookies (the access cookie deliberately outlives the signed token's
    /// own expiry — refresh is what extends usable session length)
    pub refresh_ttl_seconds: i64,
    /// Whether session cookies carry the Secure attribute
    pub cookie_secure: bool,
    /// Bootstrap admin credentials, applied when no admin account exists
    pub admin_username: String,
    pub admin_password: String,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "stockroom.db".into()),
            jwt: JwtConfig::default(),
            refresh_ttl_seconds: std::env::var("REFRESH_TTL_SECONDS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(14 * 24 * 3600),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "changeme".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
