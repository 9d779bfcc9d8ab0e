//! Sales Handlers

use axum::http::StatusCode;
use axum::{Extension, Router, extract::Path, extract::State, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{CurrentUser, Role, require_role};
use crate::core::ServerState;
use crate::db::models::{Sale, SaleItem, SaleLine};
use crate::utils::{ApiResponse, AppError, Json, created, ok};

/// Sales routes - require role seller or above
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/sales", post(create))
        .route("/sales/{id}", get(get_by_id))
        .route_layer(axum::middleware::from_fn(require_role(Role::Seller)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub location_id: String,
    #[validate(length(min = 1), nested)]
    pub list: Vec<SaleItemRequest>,
}

// Serialize is needed so a failed length rule can echo the offending value
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRequest {
    pub product_id: String,
    #[validate(range(min = 1))]
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// Create a sale on behalf of the authenticated seller
async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<String>>), AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let lines: Vec<SaleLine> = req
        .list
        .into_iter()
        .map(|item| SaleLine {
            product_id: item.product_id,
            quantity: item.quantity,
        })
        .collect();

    let sale = state
        .sales()
        .create(&user.id, &req.location_id, &lines)
        .await?;

    Ok(created(sale.id))
}

/// Fetch a sale with its items
async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SaleDetail>>, AppError> {
    let (sale, items) = state
        .sales()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("sale {id}")))?;

    Ok(ok(SaleDetail { sale, items }))
}
