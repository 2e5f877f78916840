//! Store API Handlers
//!
//! Browsing is open to any authenticated user; creation is retailer-only
//! and limited to one store per retailer.

use axum::{
    Json,
    extract::{Path, State},
};

use shared::client::StoreCreateRequest;
use shared::types::AppRole;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, Store, StoreCreate};
use crate::utils::validation::{MAX_ADDRESS_LEN, MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, now_millis};

/// GET /api/stores - all active stores
pub async fn list(State(state): State<ServerState>, _user: CurrentUser) -> AppResult<Json<Vec<Store>>> {
    let stores = state.stores.find_all().await?;
    Ok(Json(stores))
}

/// POST /api/stores - create the caller's store (retailer)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<StoreCreateRequest>,
) -> AppResult<Json<Store>> {
    user.require_role(AppRole::Retailer)?;
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&req.address, "address", MAX_ADDRESS_LEN)?;

    if state.stores.find_by_owner(&user.id).await?.is_some() {
        return Err(AppError::conflict("Retailer already has a store"));
    }

    let store = state
        .stores
        .create(
            StoreCreate {
                owner: user.id.clone(),
                name: req.name.trim().to_string(),
                address: req.address.trim().to_string(),
            },
            now_millis(),
        )
        .await?;
    state.resource_versions.increment("store");
    Ok(Json(store))
}

/// GET /api/stores/mine - the caller's store (retailer)
pub async fn mine(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<Store>> {
    user.require_role(AppRole::Retailer)?;
    let store = state
        .stores
        .find_by_owner(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("No store for this retailer"))?;
    Ok(Json(store))
}

/// GET /api/stores/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Store>> {
    let store = state
        .stores
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Store {id} not found")))?;
    Ok(Json(store))
}

/// GET /api/stores/{id}/products
pub async fn list_products(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.products.find_by_store(&id).await?;
    Ok(Json(products))
}
