//! Product API Handlers
//!
//! Catalog writes are retailer-only and scoped to the caller's own
//! store. Stock is set once at creation; the update payload carries no
//! stock field because stock only moves through checkout.

use axum::{
    Json,
    extract::{Path, State},
};

use shared::client::{ProductCreateRequest, ProductUpdateRequest};
use shared::types::AppRole;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate, Store};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_amount, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, now_millis};

const RESOURCE_PRODUCT: &str = "product";

/// GET /api/products - browse the whole catalog
pub async fn list(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.products.find_all().await?;
    Ok(Json(products))
}

/// POST /api/products - add a product to the caller's store (retailer)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<ProductCreateRequest>,
) -> AppResult<Json<Product>> {
    let store = require_own_store(&state, &user).await?;
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(req.description.as_deref(), "description", MAX_NOTE_LEN)?;
    validate_amount(req.price, "price")?;
    if req.stock_quantity < 0 {
        return Err(AppError::validation("stockQuantity must not be negative"));
    }

    let store_id = store
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::internal("Store row has no id"))?;
    let product = state
        .products
        .create(
            ProductCreate {
                store: store_id,
                name: req.name.trim().to_string(),
                description: req.description,
                price: req.price,
                stock_quantity: req.stock_quantity,
                category: req.category,
            },
            now_millis(),
        )
        .await?;
    state.resource_versions.increment(RESOURCE_PRODUCT);
    Ok(Json(product))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state
        .products
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(product))
}

/// PUT /api/products/{id} - update the caller's own product (retailer)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<ProductUpdateRequest>,
) -> AppResult<Json<Product>> {
    let store = require_own_store(&state, &user).await?;
    let existing = state
        .products
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    if store.id != Some(existing.store.clone()) {
        return Err(AppError::forbidden("Product belongs to another store"));
    }
    if let Some(name) = req.name.as_deref() {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(req.description.as_deref(), "description", MAX_NOTE_LEN)?;
    if let Some(price) = req.price {
        validate_amount(price, "price")?;
    }

    let product = state
        .products
        .update(
            &id,
            ProductUpdate {
                name: req.name,
                description: req.description,
                price: req.price,
                category: req.category,
                is_available: req.is_available,
            },
            now_millis(),
        )
        .await?;
    state.resource_versions.increment(RESOURCE_PRODUCT);
    Ok(Json(product))
}

/// DELETE /api/products/{id} (retailer, own store only)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let store = require_own_store(&state, &user).await?;
    let existing = state
        .products
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    if store.id != Some(existing.store.clone()) {
        return Err(AppError::forbidden("Product belongs to another store"));
    }

    state.products.delete(&id).await?;
    state.resource_versions.increment(RESOURCE_PRODUCT);
    Ok(Json(serde_json::json!({ "deleted": id })))
}

async fn require_own_store(state: &ServerState, user: &CurrentUser) -> Result<Store, AppError> {
    user.require_role(AppRole::Retailer)?;
    state
        .stores
        .find_by_owner(&user.id)
        .await?
        .ok_or_else(|| AppError::business_rule("Create a store before managing products"))
}
