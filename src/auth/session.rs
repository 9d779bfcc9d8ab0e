//! Session Engine
//!
//! Login, refresh-token rotation, and logout. The refresh token is an
//! opaque random string stored on the user row together with its expiry;
//! every successful refresh replaces it, so presenting a stale or
//! already-rotated token fails closed.
//!
//! All read-then-write sequences on the user row run inside a single
//! `BEGIN IMMEDIATE` transaction, so a concurrent rotation of the same
//! token cannot be silently incorporated mid-flight.

use chrono::{Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::{JwtService, Role};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// Result of a successful login or refresh
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub user_id: String,
    pub role: Role,
    pub access_token: String,
    pub refresh_token: String,
}

/// Session service - drives the credential state machine
#[derive(Clone)]
pub struct SessionService {
    pool: SqlitePool,
    jwt: Arc<JwtService>,
    refresh_ttl: Duration,
}

impl SessionService {
    pub fn new(pool: SqlitePool, jwt: Arc<JwtService>, refresh_ttl_secs: i64) -> Self {
        Self {
            pool,
            jwt,
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
        }
    }

    /// Validate credentials and open a session.
    ///
    /// Unknown username and wrong password return the same generic error;
    /// the endpoint must not reveal which of the two failed.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthenticatedSession> {
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let user = UserRepository::find_by_username_on(&mut tx, username).await?;
        let Some(user) = user else {
            // clean finish with zero writes, then the generic error
            tx.commit().await.map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::invalid_credentials());
        };

        let password_valid = user.verify_password(password).unwrap_or(false);
        if !password_valid {
            tx.commit().await.map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::invalid_credentials());
        }

        let refresh_token = mint_refresh_token()?;
        let expires_at = Utc::now() + self.refresh_ttl;
        UserRepository::set_refresh_token_on(&mut tx, &user.id, &refresh_token, expires_at).await?;

        tx.commit().await.map_err(|e| AppError::Database(e.to_string()))?;

        let access_token = self
            .jwt
            .generate_access_token(&user.id, user.role)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(AuthenticatedSession {
            user_id: user.id,
            role: user.role,
            access_token,
            refresh_token,
        })
    }

    /// Rotate the refresh token and mint a new access token.
    ///
    /// The access token is used only to recover the claimed user id; its
    /// signature is verified but its expiry is ignored. The supplied refresh
    /// token must match the stored one and must not be past its expiry.
    pub async fn refresh(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> AppResult<AuthenticatedSession> {
        let claims = self
            .jwt
            .decode_ignoring_expiry(access_token)
            .map_err(|_| AppError::Forbidden("invalid access token".to_string()))?;

        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let user = UserRepository::find_by_id_on(&mut tx, &claims.sub).await?;
        let valid = user.as_ref().is_some_and(|u| {
            u.refresh_token.as_deref() == Some(refresh_token)
                && u.refresh_token_expires_at
                    .is_some_and(|exp| exp > Utc::now())
        });

        let Some(user) = user.filter(|_| valid) else {
            tx.commit().await.map_err(|e| AppError::Database(e.to_string()))?;
            crate::security_log!(
                "WARN",
                "refresh_rejected",
                user_id = claims.sub.clone()
            );
            return Err(AppError::Forbidden(
                "invalid or expired refresh token".to_string(),
            ));
        };

        let new_refresh = mint_refresh_token()?;
        let expires_at = Utc::now() + self.refresh_ttl;
        UserRepository::set_refresh_token_on(&mut tx, &user.id, &new_refresh, expires_at).await?;

        tx.commit().await.map_err(|e| AppError::Database(e.to_string()))?;

        let access_token = self
            .jwt
            .generate_access_token(&user.id, user.role)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(AuthenticatedSession {
            user_id: user.id,
            role: user.role,
            access_token,
            refresh_token: new_refresh,
        })
    }

    /// Revoke the stored refresh token, best effort.
    ///
    /// Logout exists so the client can drop its cookies; it must appear to
    /// succeed no matter what state the server is in, so every failure here
    /// is swallowed.
    pub async fn logout(&self, access_token: Option<&str>) {
        let Some(token) = access_token else {
            return;
        };
        let Ok(claims) = self.jwt.decode_ignoring_expiry(token) else {
            return;
        };

        match UserRepository::clear_refresh_token(&self.pool, &claims.sub).await {
            Ok(()) => tracing::info!(user_id = %claims.sub, "User logged out"),
            Err(e) => tracing::debug!(user_id = %claims.sub, error = %e, "Logout cleanup skipped"),
        }
    }

    /// Refresh-token TTL, as the cookie max-age for both session cookies
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl.num_seconds()
    }
}

/// Generate a fresh opaque refresh token (32 random bytes, hex encoded)
fn mint_refresh_token() -> AppResult<String> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes)
        .map_err(|_| AppError::Internal("failed to generate refresh token".to_string()))?;
    Ok(hex::encode(bytes))
}
