//! Assignment Service
//!
//! Claim and decline. Claim delegates the race to the repository's
//! conditional update and only interprets its outcome: a zero-row
//! update is disambiguated by a follow-up read into "somebody else won"
//! versus "order not claimable". Decline appends to the rejection
//! ledger and reports the cooldown window back to the courier.

use shared::order::OrderStatus;
use thiserror::Error;
use tracing::{info, warn};

use crate::db::models::{OrderEnriched, OrderRejection};
use crate::db::repository::{
    HistoryRepository, OrderRepository, RejectionRepository, RepoError,
};
use crate::utils::now_millis;

#[derive(Debug, Error)]
pub enum ClaimError {
    /// Another courier holds the order; carries the winner for the 409 body
    #[error("Order already assigned to {courier_name}")]
    AlreadyAssigned {
        courier_id: String,
        courier_name: String,
        assigned_at: i64,
    },

    #[error("Order {0} not found")]
    NotFound(String),

    /// The order exists but is not in a claimable state
    #[error("{0}")]
    Unavailable(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Error)]
pub enum DeclineError {
    #[error("Order {0} not found")]
    NotFound(String),

    /// This courier already declined this order
    #[error("Order already rejected")]
    Duplicate,

    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for DeclineError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate(_) => DeclineError::Duplicate,
            other => DeclineError::Repo(other),
        }
    }
}

/// Outcome of a successful decline
#[derive(Debug, Clone)]
pub struct DeclineReceipt {
    pub order_id: String,
    pub rejected_at: i64,
    pub reofferable_after: i64,
}

#[derive(Clone)]
pub struct AssignmentService {
    orders: OrderRepository,
    rejections: RejectionRepository,
    history: HistoryRepository,
    cooldown_millis: i64,
}

impl AssignmentService {
    pub fn new(
        orders: OrderRepository,
        rejections: RejectionRepository,
        history: HistoryRepository,
        cooldown_minutes: i64,
    ) -> Self {
        Self {
            orders,
            rejections,
            history,
            cooldown_millis: cooldown_minutes * 60 * 1000,
        }
    }

    /// Claim an order for a courier.
    ///
    /// Exactly one concurrent caller gets `Ok`; every loser gets
    /// `AlreadyAssigned` naming the winner, including a caller racing
    /// itself. The audit row is appended after the claim commits; if it
    /// fails the claim stands and we log instead.
    pub async fn claim(&self, order_id: &str, courier_id: &str) -> Result<OrderEnriched, ClaimError> {
        let now = now_millis();

        match self.orders.claim(order_id, courier_id, now).await? {
            Some(_) => {
                info!(order_id, courier_id, "order claimed");
                if let Err(e) = self
                    .history
                    .append(
                        order_id,
                        OrderStatus::ReadyForPickup,
                        OrderStatus::PickedUp,
                        Some(courier_id),
                        now,
                    )
                    .await
                {
                    warn!(order_id, error = %e, "claim committed but history append failed");
                }
                // Re-read enriched so the response carries the resolved
                // store/customer display fields
                self.orders
                    .find_enriched(order_id)
                    .await?
                    .ok_or_else(|| ClaimError::NotFound(order_id.to_string()))
            }
            None => Err(self.explain_lost_claim(order_id).await?),
        }
    }

    /// The conditional update matched nothing; read the row to say why
    async fn explain_lost_claim(&self, order_id: &str) -> Result<ClaimError, RepoError> {
        let Some(order) = self.orders.find_enriched(order_id).await? else {
            return Ok(ClaimError::NotFound(order_id.to_string()));
        };
        match order.courier {
            Some(courier) => Ok(ClaimError::AlreadyAssigned {
                courier_id: courier.to_string(),
                courier_name: order.courier_name.unwrap_or_default(),
                assigned_at: order.assigned_at.unwrap_or(order.updated_at),
            }),
            None => Ok(ClaimError::Unavailable(format!(
                "Order is not available for pickup (status: {})",
                order.status.as_str()
            ))),
        }
    }

    /// Record a decline with a fresh cooldown window.
    pub async fn decline(
        &self,
        order_id: &str,
        courier_id: &str,
        reason: Option<String>,
    ) -> Result<DeclineReceipt, DeclineError> {
        let now = now_millis();

        if self.orders.find_by_id(order_id).await?.is_none() {
            return Err(DeclineError::NotFound(order_id.to_string()));
        }

        let reofferable_after = now + self.cooldown_millis;
        let rejection = self
            .rejections
            .create(order_id, courier_id, reason, reofferable_after, now)
            .await?;
        info!(order_id, courier_id, reofferable_after, "order declined");

        Ok(DeclineReceipt {
            order_id: order_id.to_string(),
            rejected_at: rejection.created_at,
            reofferable_after: rejection.reofferable_after,
        })
    }

    /// Claimable orders for this courier, cooldowns applied
    pub async fn available(&self, courier_id: &str) -> Result<Vec<OrderEnriched>, RepoError> {
        self.orders
            .available_for_courier(courier_id, now_millis())
            .await
    }

    pub async fn rejections_for(&self, courier_id: &str) -> Result<Vec<OrderRejection>, RepoError> {
        self.rejections.find_by_courier(courier_id).await
    }
}
