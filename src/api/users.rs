//! User Handlers
//!
//! Registration is admin-only; passwords are hashed in the repository and
//! never stored or returned in plaintext.

use axum::http::StatusCode;
use axum::{Router, extract::State, routing::post};
use serde::Deserialize;
use validator::Validate;

use crate::auth::{Role, require_role};
use crate::core::ServerState;
use crate::db::models::UserCreate;
use crate::utils::{ApiResponse, AppError, Json, created};

/// User routes - admin only
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/users", post(create))
        .route_layer(axum::middleware::from_fn(require_role(Role::Admin)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub display_name: Option<String>,
    pub role: Role,
}

async fn create(
    State(state): State<ServerState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<String>>), AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state
        .users()
        .create(UserCreate {
            username: req.username,
            password: req.password,
            display_name: req.display_name,
            role: req.role,
        })
        .await?;

    Ok(created(user.id))
}
