//! Server State
//!
//! Holds shared references to all services; `Clone` is a shallow copy.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{JwtService, Role, SessionService};
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::UserCreate;
use crate::db::repository::{
    LocationRepository, ProductRepository, SaleRepository, StockRepository, UserRepository,
};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    db: DbService,
    jwt: Arc<JwtService>,
    sessions: SessionService,
}

impl ServerState {
    /// Initialize all services: role-mask check, database, JWT, sessions,
    /// and the bootstrap admin account.
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        Role::assert_mask_coherence();

        let db = DbService::new(&config.database_path).await?;
        let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));
        let sessions = SessionService::new(db.pool.clone(), jwt.clone(), config.refresh_ttl_seconds);

        let state = Self {
            config: Arc::new(config.clone()),
            db,
            jwt,
            sessions,
        };

        state.bootstrap_admin().await?;
        Ok(state)
    }

    /// Create the admin account on first start
    async fn bootstrap_admin(&self) -> AppResult<()> {
        let users = self.users();
        if users
            .find_by_username(&self.config.admin_username)
            .await?
            .is_some()
        {
            return Ok(());
        }

        if self.config.is_production() && self.config.admin_password == "changeme" {
            return Err(AppError::Internal(
                "ADMIN_PASSWORD must be set in production".to_string(),
            ));
        }

        let admin = users
            .create(UserCreate {
                username: self.config.admin_username.clone(),
                password: self.config.admin_password.clone(),
                display_name: Some("Administrator".to_string()),
                role: Role::Admin,
            })
            .await?;
        tracing::info!(user_id = %admin.id, username = %admin.username, "Bootstrap admin created");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    pub fn db(&self) -> &DbService {
        &self.db
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.db.pool.clone())
    }

    pub fn locations(&self) -> LocationRepository {
        LocationRepository::new(self.db.pool.clone())
    }

    pub fn stock(&self) -> StockRepository {
        StockRepository::new(self.db.pool.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.db.pool.clone())
    }
}
