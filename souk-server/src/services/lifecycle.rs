//! Lifecycle Service
//!
//! Status transitions requested over the API. The actor is resolved
//! from the caller's role plus their relationship to the order, the
//! shared state machine authorizes the move, and the repository applies
//! it with a conditional update so a transition raced by another client
//! surfaces as a conflict instead of a double-apply. Claim is not
//! reachable here; couriers acquire orders only through the assignment
//! endpoint.

use shared::order::{OrderStatus, TransitionActor, TransitionError};
use shared::types::AppRole;
use thiserror::Error;
use tracing::{info, warn};

use crate::db::models::Order;
use crate::db::repository::{
    HistoryRepository, OrderRepository, RepoError, StoreRepository, make_record_id,
};
use crate::utils::now_millis;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Order {0} not found")]
    NotFound(String),

    /// The caller has no relationship to this order that permits the move
    #[error("Not allowed to update this order")]
    Forbidden,

    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// The order changed under us between read and update
    #[error("Order status changed concurrently, retry")]
    Conflict,

    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct LifecycleService {
    orders: OrderRepository,
    stores: StoreRepository,
    history: HistoryRepository,
}

impl LifecycleService {
    pub fn new(
        orders: OrderRepository,
        stores: StoreRepository,
        history: HistoryRepository,
    ) -> Self {
        Self {
            orders,
            stores,
            history,
        }
    }

    /// Advance (or cancel) an order on behalf of `user_id` acting as `role`.
    pub async fn update_status(
        &self,
        order_id: &str,
        target: OrderStatus,
        user_id: &str,
        role: AppRole,
    ) -> Result<Order, LifecycleError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(order_id.to_string()))?;

        let actor = self.resolve_actor(&order, user_id, role).await?;
        order.status.authorize(target, actor)?;

        // Couriers may only move their own delivery
        let courier_guard = matches!(actor, TransitionActor::Courier).then_some(user_id);

        let now = now_millis();
        let updated = self
            .orders
            .advance_status(order_id, order.status, target, courier_guard, now)
            .await?
            .ok_or(LifecycleError::Conflict)?;

        info!(order_id, from = order.status.as_str(), to = target.as_str(), "status updated");
        let courier_for_history = updated.courier.as_ref().map(|c| c.to_string());
        if let Err(e) = self
            .history
            .append(
                order_id,
                order.status,
                target,
                courier_for_history.as_deref(),
                now,
            )
            .await
        {
            warn!(order_id, error = %e, "transition committed but history append failed");
        }
        Ok(updated)
    }

    /// Map the caller onto a transition actor, or refuse.
    ///
    /// Retailer must own the order's store, courier must be its assigned
    /// courier, customer must be its buyer.
    async fn resolve_actor(
        &self,
        order: &Order,
        user_id: &str,
        role: AppRole,
    ) -> Result<TransitionActor, LifecycleError> {
        // RecordId display escapes some keys; compare as RecordIds,
        // never as strings
        let caller = make_record_id("profile", user_id);
        match role {
            AppRole::Retailer => {
                let store = self
                    .stores
                    .find_by_owner(user_id)
                    .await?
                    .ok_or(LifecycleError::Forbidden)?;
                if store.id == Some(order.store.clone()) {
                    Ok(TransitionActor::StoreOwner)
                } else {
                    Err(LifecycleError::Forbidden)
                }
            }
            AppRole::Courier => match &order.courier {
                Some(link) if *link == caller => Ok(TransitionActor::Courier),
                _ => Err(LifecycleError::Forbidden),
            },
            AppRole::Customer => {
                if order.customer == caller {
                    Ok(TransitionActor::Customer)
                } else {
                    Err(LifecycleError::Forbidden)
                }
            }
        }
    }
}
