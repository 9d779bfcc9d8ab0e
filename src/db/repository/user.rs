//! User Repository

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::{RepoError, RepoResult, constraint_error};
use crate::db::models::{User, UserCreate};

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Create a new user
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let password_hash = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("failed to hash password: {e}")))?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            display_name: data.display_name.unwrap_or_else(|| data.username.clone()),
            username: data.username,
            password_hash,
            role: data.role,
            refresh_token: None,
            refresh_token_expires_at: None,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO users
                (id, username, password_hash, display_name, role, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| constraint_error(e, "username", "user"))?;

        Ok(user)
    }

    // ===== transaction-scoped helpers used by the session engine =====

    /// Find user by username on an open transaction
    pub(crate) async fn find_by_username_on(
        conn: &mut SqliteConnection,
        username: &str,
    ) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(conn)
            .await?;
        Ok(user)
    }

    /// Find user by id on an open transaction
    pub(crate) async fn find_by_id_on(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(user)
    }

    /// Store a fresh refresh token and its expiry on an open transaction
    pub(crate) async fn set_refresh_token_on(
        conn: &mut SqliteConnection,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"UPDATE users
                SET refresh_token = ?, refresh_token_expires_at = ?, updated_at = ?
                WHERE id = ?"#,
        )
        .bind(token)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(user_id)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("user {user_id}")));
        }
        Ok(())
    }

    /// Clear the stored refresh token (logout)
    pub async fn clear_refresh_token(pool: &SqlitePool, user_id: &str) -> RepoResult<()> {
        sqlx::query(
            r#"UPDATE users
                SET refresh_token = NULL, refresh_token_expires_at = NULL, updated_at = ?
                WHERE id = ?"#,
        )
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
