//! Product Handlers
//!
//! Product creation/lookup and the bulk stock update.

use axum::http::StatusCode;
use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{Role, require_role};
use crate::core::ServerState;
use crate::db::models::{CategoryAttrs, Product, ProductCreate, StockLevel};
use crate::utils::{ApiResponse, AppError, Json, created, ok};

/// Product routes; mutations require role manager or above
pub fn router() -> Router<ServerState> {
    let manager = Router::new()
        .route("/products", post(create))
        .route("/products/{id}/stock", patch(update_stock))
        .route_layer(axum::middleware::from_fn(require_role(Role::Manager)));

    Router::new()
        .route("/products/{id}", get(get_by_id))
        .merge(manager)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: i64,
    pub attributes: CategoryAttrs,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockRequest {
    #[validate(length(min = 1), nested)]
    pub list: Vec<StockLevelRequest>,
}

// Serialize is needed so a failed length rule can echo the offending value
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StockLevelRequest {
    pub location_id: String,
    #[validate(range(min = 0))]
    pub quantity: i64,
}

/// Create a product; its category comes from the attribute payload
async fn create(
    State(state): State<ServerState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let product = state
        .products()
        .create(ProductCreate {
            name: req.name,
            description: req.description,
            price_cents: req.price_cents,
            attributes: req.attributes,
        })
        .await?;

    Ok(created(product))
}

/// Fetch a product
async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let product = state
        .products()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ok(product))
}

/// Set absolute stock quantities for a product across locations
async fn update_stock(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStockRequest>,
) -> Result<StatusCode, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updates: Vec<StockLevel> = req
        .list
        .into_iter()
        .map(|level| StockLevel {
            location_id: level.location_id,
            quantity: level.quantity,
        })
        .collect();

    state.stock().bulk_set(&id, &updates).await?;
    Ok(StatusCode::NO_CONTENT)
}
