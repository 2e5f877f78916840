//! Order API Handlers
//!
//! `accept_order` and `reject_order` implement the courier assignment
//! protocol wire shapes: success carries the enriched delivery details,
//! an already-claimed order answers 409 with the winning courier, and a
//! repeated decline answers 409 conflict.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use shared::client::{
    AcceptOrderRequest, AcceptOrderResponse, AssignedCourier, OrderAlreadyAssignedResponse,
    RejectOrderRequest, RejectOrderResponse, StatusUpdateRequest,
};
use shared::order::TransitionError;
use shared::types::AppRole;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{DeliveryHistory, OrderEnriched, OrderItem, OrderRejection};
use crate::db::repository::make_record_id;
use crate::services::{ClaimError, DeclineError, LifecycleError};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

const RESOURCE_ORDER: &str = "order";

/// POST /accept-order - claim an order for delivery (courier)
///
/// Exactly one concurrent caller wins; losers get a 409 naming the
/// winner, which clients use to drop the card from their offer list.
pub async fn accept_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<AcceptOrderRequest>,
) -> AppResult<Response> {
    user.require_role(AppRole::Courier)?;

    match state.assignment.claim(&req.order_id, &user.id).await {
        Ok(order) => {
            state.resource_versions.increment(RESOURCE_ORDER);
            let body = accept_response(&order, &user);
            Ok(Json(body).into_response())
        }
        Err(ClaimError::AlreadyAssigned {
            courier_id,
            courier_name,
            assigned_at,
        }) => {
            let body = OrderAlreadyAssignedResponse {
                error: "OrderAlreadyAssigned".to_string(),
                assigned_to: AssignedCourier {
                    id: courier_id,
                    name: courier_name,
                },
                assigned_at,
            };
            Ok((StatusCode::CONFLICT, Json(body)).into_response())
        }
        Err(ClaimError::NotFound(id)) => Err(AppError::not_found(format!("Order {id} not found"))),
        // An unclaimable order answers the same as a missing one: the
        // offer no longer exists from the courier's point of view
        Err(ClaimError::Unavailable(msg)) => Err(AppError::not_found(msg)),
        Err(ClaimError::Repo(e)) => Err(e.into()),
    }
}

/// POST /reject-order - decline an offered order (courier)
///
/// Starts the cooldown window; the order disappears from this courier's
/// available list until `reofferableAfter`.
pub async fn reject_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<RejectOrderRequest>,
) -> AppResult<Json<RejectOrderResponse>> {
    user.require_role(AppRole::Courier)?;
    validate_optional_text(req.reason.as_deref(), "reason", MAX_NOTE_LEN)?;

    let receipt = state
        .assignment
        .decline(&req.order_id, &user.id, req.reason)
        .await
        .map_err(|e| match e {
            DeclineError::NotFound(id) => AppError::not_found(format!("Order {id} not found")),
            DeclineError::Duplicate => AppError::conflict("Order already rejected"),
            DeclineError::Repo(e) => e.into(),
        })?;

    Ok(Json(RejectOrderResponse {
        success: true,
        message: "Order rejected".to_string(),
        order_id: receipt.order_id,
        rejected_at: receipt.rejected_at,
        reofferable_after: receipt.reofferable_after,
    }))
}

/// GET /api/orders/available - claimable orders (courier, cooldowns applied)
pub async fn available(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderEnriched>>> {
    user.require_role(AppRole::Courier)?;
    let orders = state.assignment.available(&user.id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/mine - the caller's purchases (customer)
pub async fn mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderEnriched>>> {
    user.require_role(AppRole::Customer)?;
    let orders = state.orders.find_by_customer(&user.id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/deliveries - the caller's assigned orders (courier)
pub async fn deliveries(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderEnriched>>> {
    user.require_role(AppRole::Courier)?;
    let orders = state.orders.find_by_courier(&user.id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/store - orders for the caller's store (retailer)
pub async fn store_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderEnriched>>> {
    user.require_role(AppRole::Retailer)?;
    let store = state
        .stores
        .find_by_owner(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("No store for this retailer"))?;
    let store_id = store
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::internal("Store row has no id"))?;
    let orders = state.orders.find_by_store(&store_id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/rejections - the caller's decline ledger (courier)
pub async fn my_rejections(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderRejection>>> {
    user.require_role(AppRole::Courier)?;
    let rejections = state.assignment.rejections_for(&user.id).await?;
    Ok(Json(rejections))
}

/// GET /api/orders/{id} - participants only
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<OrderEnriched>> {
    let order = load_for_participant(&state, &user, &id).await?;
    Ok(Json(order))
}

/// GET /api/orders/{id}/items
pub async fn items(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<OrderItem>>> {
    load_for_participant(&state, &user, &id).await?;
    let items = state.orders.items_for_order(&id).await?;
    Ok(Json(items))
}

/// GET /api/orders/{id}/history - status transition audit trail
pub async fn history(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<DeliveryHistory>>> {
    load_for_participant(&state, &user, &id).await?;
    let rows = state.history.list_for_order(&id).await?;
    Ok(Json(rows))
}

/// PUT /api/orders/{id}/status - advance or cancel
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> AppResult<Json<OrderEnriched>> {
    state
        .lifecycle
        .update_status(&id, req.status, &user.id, user.role)
        .await
        .map_err(|e| match e {
            LifecycleError::NotFound(id) => AppError::not_found(format!("Order {id} not found")),
            LifecycleError::Forbidden => AppError::forbidden("Not allowed to update this order"),
            LifecycleError::Transition(TransitionError::NotAuthorized { from, to }) => {
                AppError::forbidden(format!("{from:?} -> {to:?} not permitted for this role"))
            }
            LifecycleError::Transition(TransitionError::Invalid { from, to }) => {
                AppError::business_rule(format!("Invalid transition {from:?} -> {to:?}"))
            }
            LifecycleError::Conflict => {
                AppError::conflict("Order status changed concurrently, retry")
            }
            LifecycleError::Repo(e) => e.into(),
        })?;
    state.resource_versions.increment(RESOURCE_ORDER);

    let order = state
        .orders
        .find_enriched(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(Json(order))
}

fn accept_response(order: &OrderEnriched, user: &CurrentUser) -> AcceptOrderResponse {
    AcceptOrderResponse {
        order_id: order
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default(),
        status: order.status,
        assigned_to: AssignedCourier {
            id: user.id.clone(),
            name: user.display_name.clone(),
        },
        assigned_at: order.assigned_at.unwrap_or(order.updated_at),
        store_name: order.store_name.clone(),
        store_address: order.store_address.clone(),
        customer_name: order.customer_name.clone(),
        customer_phone: order.customer_phone.clone(),
        delivery_address: order.delivery_address.clone(),
        delivery_earning: order.delivery_earning,
    }
}

/// Fetch an order and refuse callers who are not its customer, its
/// assigned courier or its store's owner
async fn load_for_participant(
    state: &ServerState,
    user: &CurrentUser,
    order_id: &str,
) -> Result<OrderEnriched, AppError> {
    let order = state
        .orders
        .find_enriched(order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;

    let caller = make_record_id("profile", &user.id);
    let allowed = match user.role {
        AppRole::Customer => order.customer == caller,
        AppRole::Courier => order.courier.as_ref() == Some(&caller),
        AppRole::Retailer => {
            let store = state.stores.find_by_owner(&user.id).await?;
            store.and_then(|s| s.id) == Some(order.store.clone())
        }
    };
    if !allowed {
        return Err(AppError::forbidden("Not a participant in this order"));
    }
    Ok(order)
}
