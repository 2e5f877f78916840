//! Checkout Service
//!
//! Turns the customer's cart into per-vendor orders. The cart is
//! partitioned by store and each group runs as its own database
//! transaction, so one vendor's empty shelf cannot undo another
//! vendor's order. Group failures come back alongside the successes
//! instead of failing the whole checkout.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{info, warn};

use crate::db::models::{CartItem, Order};
use crate::db::repository::order::CheckoutLine;
use crate::db::repository::{CartRepository, OrderRepository, RepoError};
use crate::utils::now_millis;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// One successful per-vendor order plus the line count it absorbed
#[derive(Debug, Clone)]
pub struct CheckoutGroup {
    pub store_id: String,
    pub order: Order,
    pub item_count: usize,
}

/// Per-vendor outcomes; `failures` lists groups whose transaction rolled
/// back (their cart lines are untouched and can be retried)
#[derive(Debug, Default)]
pub struct CheckoutOutcome {
    pub orders: Vec<CheckoutGroup>,
    pub failures: Vec<(String, String)>,
}

#[derive(Clone)]
pub struct CheckoutService {
    carts: CartRepository,
    orders: OrderRepository,
    delivery_earning: f64,
}

impl CheckoutService {
    pub fn new(carts: CartRepository, orders: OrderRepository, delivery_earning: f64) -> Self {
        Self {
            carts,
            orders,
            delivery_earning,
        }
    }

    pub async fn checkout(
        &self,
        customer_id: &str,
        delivery_address: &str,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let address = delivery_address.trim();
        if address.is_empty() {
            return Err(CheckoutError::Validation(
                "Delivery address is required".into(),
            ));
        }

        let cart = self.carts.find_by_owner(customer_id).await?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut outcome = CheckoutOutcome::default();
        for (store_id, lines) in partition_by_store(cart) {
            let item_count = lines.len();
            match self
                .orders
                .create_group(
                    customer_id,
                    &store_id,
                    lines,
                    address,
                    self.delivery_earning,
                    now_millis(),
                )
                .await
            {
                Ok(order) => {
                    info!(customer_id, store_id, total = order.total_amount, "order created");
                    outcome.orders.push(CheckoutGroup {
                        store_id,
                        order,
                        item_count,
                    });
                }
                // RepoError::Validation is the rolled-back THROW (short
                // stock); anything else is a real database failure but
                // still only sinks this group
                Err(e) => {
                    warn!(customer_id, store_id, error = %e, "checkout group failed");
                    outcome.failures.push((store_id, e.to_string()));
                }
            }
        }
        Ok(outcome)
    }
}

/// Group cart lines by store; BTreeMap keeps group order deterministic
fn partition_by_store(cart: Vec<CartItem>) -> BTreeMap<String, Vec<CheckoutLine>> {
    let mut groups: BTreeMap<String, Vec<CheckoutLine>> = BTreeMap::new();
    for item in cart {
        groups
            .entry(item.store.to_string())
            .or_default()
            .push(CheckoutLine {
                product: item.product,
                name: item.name,
                price: item.price,
                quantity: item.quantity,
            });
    }
    groups
}
