//! Checkout API Handler

use axum::{Json, extract::State};

use shared::client::{CheckoutFailure, CheckoutOrderSummary, CheckoutRequest, CheckoutResponse};
use shared::types::AppRole;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::CheckoutError;
use crate::utils::validation::{MAX_ADDRESS_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// POST /api/checkout - cart to per-vendor orders
///
/// Partial success is a 200: each vendor group either shows up under
/// `orders` or under `failures` with the cause.
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    user.require_role(AppRole::Customer)?;
    validate_required_text(&req.delivery_address, "delivery_address", MAX_ADDRESS_LEN)?;

    let outcome = state
        .checkout
        .checkout(&user.id, &req.delivery_address)
        .await
        .map_err(|e| match e {
            CheckoutError::EmptyCart => AppError::business_rule("Cart is empty"),
            CheckoutError::Validation(msg) => AppError::validation(msg),
            CheckoutError::Repo(e) => e.into(),
        })?;

    if !outcome.orders.is_empty() {
        state.resource_versions.increment("order");
        state.resource_versions.increment("product");
        state.resource_versions.increment("cart");
    }

    let orders = outcome
        .orders
        .into_iter()
        .map(|group| CheckoutOrderSummary {
            order_id: group
                .order
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            store_id: group.store_id,
            status: group.order.status,
            payment_status: group.order.payment_status,
            total_amount: group.order.total_amount,
            item_count: group.item_count,
        })
        .collect();
    let failures = outcome
        .failures
        .into_iter()
        .map(|(store_id, error)| CheckoutFailure { store_id, error })
        .collect();

    Ok(Json(CheckoutResponse { orders, failures }))
}
