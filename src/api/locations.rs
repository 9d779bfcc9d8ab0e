//! Location Handlers

use axum::http::StatusCode;
use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::{Role, require_role};
use crate::core::ServerState;
use crate::db::models::{Location, LocationCreate};
use crate::utils::{ApiResponse, AppError, Json, created, ok};

/// Location routes; creation requires role manager or above
pub fn router() -> Router<ServerState> {
    let manager = Router::new()
        .route("/locations", post(create))
        .route_layer(axum::middleware::from_fn(require_role(Role::Manager)));

    Router::new()
        .route("/locations/{id}", get(get_by_id))
        .merge(manager)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLocationRequest {
    #[validate(length(min = 1))]
    pub address: String,
}

async fn create(
    State(state): State<ServerState>,
    Json(req): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Location>>), AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let location = state
        .locations()
        .create(LocationCreate {
            address: req.address,
        })
        .await?;

    Ok(created(location))
}

async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Location>>, AppError> {
    let location = state
        .locations()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("location {id}")))?;

    Ok(ok(location))
}
