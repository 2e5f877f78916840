//! Cart API Handlers
//!
//! Customer-only. Cart lines snapshot the product price at add time;
//! stock is not reserved here, checkout verifies it transactionally.

use axum::{
    Json,
    extract::{Path, State},
};

use shared::client::{CartAddRequest, CartSetQuantityRequest};
use shared::types::AppRole;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::CartItem;
use crate::utils::validation::validate_quantity;
use crate::utils::{AppError, AppResult, now_millis};

/// GET /api/cart
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<CartItem>>> {
    user.require_role(AppRole::Customer)?;
    let items = state.carts.find_by_owner(&user.id).await?;
    Ok(Json(items))
}

/// POST /api/cart - add a product (increments when already present)
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CartAddRequest>,
) -> AppResult<Json<CartItem>> {
    user.require_role(AppRole::Customer)?;
    validate_quantity(req.quantity, "quantity")?;

    let product = state
        .products
        .find_by_id(&req.product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", req.product_id)))?;
    if !product.is_available {
        return Err(AppError::business_rule("Product is not available"));
    }

    let item = state
        .carts
        .add(&user.id, &product, req.quantity, now_millis())
        .await?;
    state.resource_versions.increment("cart");
    Ok(Json(item))
}

/// PUT /api/cart/{product_id} - set exact quantity, 0 removes the line
pub async fn set_quantity(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<String>,
    Json(req): Json<CartSetQuantityRequest>,
) -> AppResult<Json<serde_json::Value>> {
    user.require_role(AppRole::Customer)?;
    if req.quantity < 0 {
        return Err(AppError::validation("quantity must not be negative"));
    }

    let item = state
        .carts
        .set_quantity(&user.id, &product_id, req.quantity, now_millis())
        .await?;
    state.resource_versions.increment("cart");
    match item {
        Some(item) => Ok(Json(serde_json::to_value(item).map_err(|e| {
            AppError::internal(format!("Serialization failed: {e}"))
        })?)),
        None => Ok(Json(serde_json::json!({ "removed": product_id }))),
    }
}

/// DELETE /api/cart/{product_id}
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    user.require_role(AppRole::Customer)?;
    state.carts.remove(&user.id, &product_id).await?;
    state.resource_versions.increment("cart");
    Ok(Json(serde_json::json!({ "removed": product_id })))
}
