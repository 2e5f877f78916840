//! Order lifecycle tests
//!
//! Role authority over transitions, the assignment-only gate into
//! PICKED_UP, terminal states, and the audit trail.

mod common;

use common::*;
use shared::order::{OrderStatus, TransitionError};
use shared::types::AppRole;
use souk_server::services::LifecycleError;

struct World {
    state: souk_server::ServerState,
    customer_id: String,
    retailer_id: String,
    courier_id: String,
    order_id: String,
}

async fn setup() -> World {
    let state = test_state().await;
    let customer = create_profile(&state, "amina", AppRole::Customer).await;
    let retailer = create_profile(&state, "youssef", AppRole::Retailer).await;
    let courier = create_profile(&state, "karim", AppRole::Courier).await;
    let store = create_store(&state, &retailer, "Chez Youssef").await;
    let product = create_product(&state, &store, "Tagine", 15.0, 10).await;
    let order_id = place_order(&state, &customer, &product, 1).await;
    World {
        customer_id: id_of(&customer.id),
        retailer_id: id_of(&retailer.id),
        courier_id: id_of(&courier.id),
        order_id,
        state,
    }
}

#[tokio::test]
async fn full_delivery_walkthrough() {
    let w = setup().await;
    let s = &w.state;

    // Store owner takes it to READY_FOR_PICKUP
    s.lifecycle
        .update_status(&w.order_id, OrderStatus::Confirmed, &w.retailer_id, AppRole::Retailer)
        .await
        .expect("confirm");
    s.lifecycle
        .update_status(&w.order_id, OrderStatus::ReadyForPickup, &w.retailer_id, AppRole::Retailer)
        .await
        .expect("ready");

    // Courier acquires through the assignment protocol
    s.assignment
        .claim(&w.order_id, &w.courier_id)
        .await
        .expect("claim");

    // Then drives the delivery
    s.lifecycle
        .update_status(&w.order_id, OrderStatus::Delivering, &w.courier_id, AppRole::Courier)
        .await
        .expect("delivering");
    s.lifecycle
        .update_status(&w.order_id, OrderStatus::Delivered, &w.courier_id, AppRole::Courier)
        .await
        .expect("delivered");

    // Customer closes it out
    let order = s
        .lifecycle
        .update_status(&w.order_id, OrderStatus::Completed, &w.customer_id, AppRole::Customer)
        .await
        .expect("completed");
    assert_eq!(order.status, OrderStatus::Completed);

    // Every hop is in the audit trail
    let history = s.history.list_for_order(&w.order_id).await.expect("history");
    let hops: Vec<(OrderStatus, OrderStatus)> = history
        .iter()
        .map(|h| (h.old_status, h.new_status))
        .collect();
    assert_eq!(
        hops,
        vec![
            (OrderStatus::Pending, OrderStatus::Confirmed),
            (OrderStatus::Confirmed, OrderStatus::ReadyForPickup),
            (OrderStatus::ReadyForPickup, OrderStatus::PickedUp),
            (OrderStatus::PickedUp, OrderStatus::Delivering),
            (OrderStatus::Delivering, OrderStatus::Delivered),
            (OrderStatus::Delivered, OrderStatus::Completed),
        ]
    );
}

#[tokio::test]
async fn customer_cannot_confirm_their_own_order() {
    let w = setup().await;
    match w
        .state
        .lifecycle
        .update_status(&w.order_id, OrderStatus::Confirmed, &w.customer_id, AppRole::Customer)
        .await
    {
        Err(LifecycleError::Transition(TransitionError::NotAuthorized { .. })) => {}
        other => panic!("expected NotAuthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn picked_up_is_unreachable_through_the_status_endpoint() {
    let w = setup().await;
    let s = &w.state;
    s.lifecycle
        .update_status(&w.order_id, OrderStatus::Confirmed, &w.retailer_id, AppRole::Retailer)
        .await
        .expect("confirm");
    s.lifecycle
        .update_status(&w.order_id, OrderStatus::ReadyForPickup, &w.retailer_id, AppRole::Retailer)
        .await
        .expect("ready");

    // Even the courier must go through claim, not the status update
    match s
        .lifecycle
        .update_status(&w.order_id, OrderStatus::PickedUp, &w.courier_id, AppRole::Courier)
        .await
    {
        Err(LifecycleError::Forbidden) => {}
        Err(LifecycleError::Transition(TransitionError::NotAuthorized { .. })) => {}
        other => panic!("expected refusal, got {other:?}"),
    }
}

#[tokio::test]
async fn unassigned_courier_cannot_advance_a_delivery() {
    let w = setup().await;
    let s = &w.state;
    s.lifecycle
        .update_status(&w.order_id, OrderStatus::Confirmed, &w.retailer_id, AppRole::Retailer)
        .await
        .expect("confirm");
    s.lifecycle
        .update_status(&w.order_id, OrderStatus::ReadyForPickup, &w.retailer_id, AppRole::Retailer)
        .await
        .expect("ready");
    s.assignment
        .claim(&w.order_id, &w.courier_id)
        .await
        .expect("claim");

    let stranger = create_profile(s, "leila", AppRole::Courier).await;
    match s
        .lifecycle
        .update_status(&w.order_id, OrderStatus::Delivering, &id_of(&stranger.id), AppRole::Courier)
        .await
    {
        Err(LifecycleError::Forbidden) => {}
        other => panic!("expected Forbidden, got {other:?}"),
    }
}

#[tokio::test]
async fn customer_can_cancel_before_delivery() {
    let w = setup().await;
    let order = w
        .state
        .lifecycle
        .update_status(&w.order_id, OrderStatus::Cancelled, &w.customer_id, AppRole::Customer)
        .await
        .expect("cancel");
    assert_eq!(order.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn delivered_order_cannot_be_cancelled() {
    let w = setup().await;
    let s = &w.state;
    s.lifecycle
        .update_status(&w.order_id, OrderStatus::Confirmed, &w.retailer_id, AppRole::Retailer)
        .await
        .expect("confirm");
    s.lifecycle
        .update_status(&w.order_id, OrderStatus::ReadyForPickup, &w.retailer_id, AppRole::Retailer)
        .await
        .expect("ready");
    s.assignment.claim(&w.order_id, &w.courier_id).await.expect("claim");
    s.lifecycle
        .update_status(&w.order_id, OrderStatus::Delivering, &w.courier_id, AppRole::Courier)
        .await
        .expect("delivering");
    s.lifecycle
        .update_status(&w.order_id, OrderStatus::Delivered, &w.courier_id, AppRole::Courier)
        .await
        .expect("delivered");

    match s
        .lifecycle
        .update_status(&w.order_id, OrderStatus::Cancelled, &w.customer_id, AppRole::Customer)
        .await
    {
        Err(LifecycleError::Transition(TransitionError::Invalid { .. })) => {}
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[tokio::test]
async fn repeated_transition_is_refused() {
    let w = setup().await;
    let s = &w.state;
    s.lifecycle
        .update_status(&w.order_id, OrderStatus::Confirmed, &w.retailer_id, AppRole::Retailer)
        .await
        .expect("confirm");

    // Move the row out from under a second Pending -> Confirmed attempt
    match s
        .lifecycle
        .update_status(&w.order_id, OrderStatus::Confirmed, &w.retailer_id, AppRole::Retailer)
        .await
    {
        Err(LifecycleError::Transition(TransitionError::Invalid { .. })) => {}
        other => panic!("expected Invalid on repeat, got {other:?}"),
    }
}

#[tokio::test]
async fn other_retailer_cannot_touch_the_order() {
    let w = setup().await;
    let s = &w.state;
    let rival = create_profile(s, "samira", AppRole::Retailer).await;
    create_store(s, &rival, "Rival store").await;

    match s
        .lifecycle
        .update_status(&w.order_id, OrderStatus::Confirmed, &id_of(&rival.id), AppRole::Retailer)
        .await
    {
        Err(LifecycleError::Forbidden) => {}
        other => panic!("expected Forbidden, got {other:?}"),
    }
}
