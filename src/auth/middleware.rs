//! Authentication Middleware
//!
//! Axum middleware for cookie-based JWT authentication and role checks.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::{CurrentUser, Role};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Name of the access-token cookie
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Name of the refresh-token cookie
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Authentication middleware - requires a valid access-token cookie.
///
/// On success, injects [`CurrentUser`] into request extensions. Missing,
/// expired, or unverifiable tokens yield 401 with a challenge header.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let jar = CookieJar::from_headers(req.headers());
    let token = match jar.get(ACCESS_TOKEN_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::Unauthorized);
        }
    };

    match state.jwt().validate_token(&token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            Err(AppError::Unauthorized)
        }
    }
}

/// Role-check middleware - requires the caller's role to dominate `required`.
///
/// Must run after [`require_auth`] (it reads the injected [`CurrentUser`]).
/// An authenticated caller with insufficient privilege gets 403.
pub fn require_role(
    required: Role,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::Unauthorized)?;

            if !user.has_privilege(required) {
                security_log!(
                    "WARN",
                    "role_denied",
                    user_id = user.id.clone(),
                    user_role = user.role.to_string(),
                    required_role = required.to_string()
                );
                return Err(AppError::Forbidden(format!(
                    "requires role {required} or above"
                )));
            }

            Ok(next.run(req).await)
        })
    }
}
