//! Authentication Handlers
//!
//! Login, refresh, logout, and the current-principal endpoint. Both
//! session tokens travel as cookies with `path=/`, `HttpOnly`, `Secure`,
//! and a max-age equal to the refresh-token TTL — the access cookie
//! intentionally outlives the signed token's internal expiry, so refresh
//! is what actually extends the session.

use axum::http::StatusCode;
use axum::{Extension, Router, extract::State, routing::get, routing::post};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{
    ACCESS_TOKEN_COOKIE, AuthenticatedSession, CurrentUser, REFRESH_TOKEN_COOKIE,
};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, Json, ok};

/// Public authentication routes (no auth middleware)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// Routes that require an authenticated caller
pub fn protected_router() -> Router<ServerState> {
    Router::new().route("/auth/me", get(me))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalInfo {
    pub id: String,
    pub role: String,
}

/// Login: validate credentials, open a session, set both cookies
async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<String>>), AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let session = state.sessions().login(&req.username, &req.password).await?;
    let jar = set_session_cookies(jar, &session, &state);

    Ok((jar, ok(session.user_id)))
}

/// Refresh: rotate the refresh token, reset both cookies
///
/// Requires both cookies. A missing cookie is an authentication failure;
/// a stale, rotated, or foreign token is a forbidden failure.
async fn refresh(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), AppError> {
    let access = jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string());
    let refresh = jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string());
    let (Some(access), Some(refresh)) = (access, refresh) else {
        return Err(AppError::Unauthorized);
    };

    let session = state.sessions().refresh(&access, &refresh).await?;
    let jar = set_session_cookies(jar, &session, &state);

    Ok((jar, StatusCode::NO_CONTENT))
}

/// Logout: clear cookies and revoke the stored refresh token, best effort.
/// Always 204, no visible failure path.
async fn logout(State(state): State<ServerState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let access = jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string());
    state.sessions().logout(access.as_deref()).await;

    let jar = jar
        .remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_TOKEN_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

/// Current authenticated principal
async fn me(
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<PrincipalInfo>>, AppError> {
    Ok(ok(PrincipalInfo {
        id: user.id,
        role: user.role.to_string(),
    }))
}

/// Set both session cookies with matching lifetimes
fn set_session_cookies(
    jar: CookieJar,
    session: &AuthenticatedSession,
    state: &ServerState,
) -> CookieJar {
    let max_age = time::Duration::seconds(state.sessions().refresh_ttl_secs());
    let secure = state.config.cookie_secure;

    let build = |name: &'static str, value: String| {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .secure(secure)
            .max_age(max_age)
            .build()
    };

    jar.add(build(ACCESS_TOKEN_COOKIE, session.access_token.clone()))
        .add(build(REFRESH_TOKEN_COOKIE, session.refresh_token.clone()))
}
