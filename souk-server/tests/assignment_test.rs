//! Courier assignment protocol tests
//!
//! The claim race is the one everything hinges on: N couriers hit the
//! same READY_FOR_PICKUP order at once and the database must let exactly
//! one through.

mod common;

use common::*;
use shared::order::OrderStatus;
use shared::types::AppRole;
use souk_server::db::repository::make_record_id;
use souk_server::services::{ClaimError, DeclineError};

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_claims_have_exactly_one_winner() {
    let state = test_state().await;
    let customer = create_profile(&state, "amina", AppRole::Customer).await;
    let retailer = create_profile(&state, "youssef", AppRole::Retailer).await;
    let store = create_store(&state, &retailer, "Chez Youssef").await;
    let product = create_product(&state, &store, "Couscous", 12.5, 50).await;

    let order_id = place_order(&state, &customer, &product, 2).await;
    make_ready(&state, &order_id).await;

    const COURIERS: usize = 20;
    let mut courier_ids = Vec::new();
    for i in 0..COURIERS {
        let p = create_profile(&state, &format!("courier{i}"), AppRole::Courier).await;
        courier_ids.push(id_of(&p.id));
    }

    let mut handles = Vec::new();
    for courier_id in courier_ids.clone() {
        let state = state.clone();
        let order_id = order_id.clone();
        handles.push(tokio::spawn(async move {
            state.assignment.claim(&order_id, &courier_id).await
        }));
    }

    let mut winners = Vec::new();
    let mut already_assigned = 0usize;
    for (i, handle) in handles.into_iter().enumerate() {
        match handle.await.expect("task join") {
            Ok(order) => {
                assert_eq!(order.status, OrderStatus::PickedUp);
                assert!(order.assigned_at.is_some());
                winners.push(courier_ids[i].clone());
            }
            Err(ClaimError::AlreadyAssigned { courier_id, .. }) => {
                assert!(!courier_id.is_empty());
                already_assigned += 1;
            }
            Err(other) => panic!("unexpected claim outcome: {other:?}"),
        }
    }

    assert_eq!(winners.len(), 1, "exactly one courier must win");
    assert_eq!(already_assigned, COURIERS - 1);

    // The row agrees with the winner
    let order = state
        .orders
        .find_by_id(&order_id)
        .await
        .expect("read back")
        .expect("order exists");
    assert_eq!(order.status, OrderStatus::PickedUp);
    assert_eq!(
        order.courier,
        Some(make_record_id("profile", &winners[0]))
    );
}

#[tokio::test]
async fn losing_couriers_learn_the_winner() {
    let state = test_state().await;
    let customer = create_profile(&state, "amina", AppRole::Customer).await;
    let retailer = create_profile(&state, "youssef", AppRole::Retailer).await;
    let store = create_store(&state, &retailer, "Chez Youssef").await;
    let product = create_product(&state, &store, "Harira", 6.0, 10).await;

    let order_id = place_order(&state, &customer, &product, 1).await;
    make_ready(&state, &order_id).await;

    let first = create_profile(&state, "karim", AppRole::Courier).await;
    let second = create_profile(&state, "leila", AppRole::Courier).await;
    let first_id = id_of(&first.id);

    state
        .assignment
        .claim(&order_id, &first_id)
        .await
        .expect("first claim wins");

    match state.assignment.claim(&order_id, &id_of(&second.id)).await {
        Err(ClaimError::AlreadyAssigned {
            courier_id,
            courier_name,
            assigned_at,
        }) => {
            assert_eq!(make_record_id("profile", &courier_id), make_record_id("profile", &first_id));
            assert_eq!(courier_name, first.display_name);
            assert!(assigned_at > 0);
        }
        other => panic!("expected AlreadyAssigned, got {other:?}"),
    }
}

#[tokio::test]
async fn pending_order_cannot_be_claimed() {
    let state = test_state().await;
    let customer = create_profile(&state, "amina", AppRole::Customer).await;
    let retailer = create_profile(&state, "youssef", AppRole::Retailer).await;
    let store = create_store(&state, &retailer, "Chez Youssef").await;
    let product = create_product(&state, &store, "Msemen", 2.0, 10).await;

    // Still PENDING, never readied
    let order_id = place_order(&state, &customer, &product, 1).await;
    let courier = create_profile(&state, "karim", AppRole::Courier).await;

    match state.assignment.claim(&order_id, &id_of(&courier.id)).await {
        Err(ClaimError::Unavailable(_)) => {}
        other => panic!("expected Unavailable, got {other:?}"),
    }

    // The failed claim must not have touched the row
    let order = state
        .orders
        .find_by_id(&order_id)
        .await
        .expect("read back")
        .expect("order exists");
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.courier.is_none());
}

#[tokio::test]
async fn claiming_missing_order_is_not_found() {
    let state = test_state().await;
    let courier = create_profile(&state, "karim", AppRole::Courier).await;

    match state
        .assignment
        .claim("order:doesnotexist", &id_of(&courier.id))
        .await
    {
        Err(ClaimError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn decline_hides_order_until_cooldown_expires() {
    let state = test_state().await;
    let customer = create_profile(&state, "amina", AppRole::Customer).await;
    let retailer = create_profile(&state, "youssef", AppRole::Retailer).await;
    let store = create_store(&state, &retailer, "Chez Youssef").await;
    let product = create_product(&state, &store, "Tagine", 15.0, 10).await;

    let order_id = place_order(&state, &customer, &product, 1).await;
    make_ready(&state, &order_id).await;

    let decliner = create_profile(&state, "karim", AppRole::Courier).await;
    let other = create_profile(&state, "leila", AppRole::Courier).await;
    let decliner_id = id_of(&decliner.id);

    let receipt = state
        .assignment
        .decline(&order_id, &decliner_id, Some("too far".into()))
        .await
        .expect("decline recorded");
    assert!(receipt.reofferable_after > receipt.rejected_at);

    // Hidden from the decliner, visible to everyone else
    let for_decliner = state.assignment.available(&decliner_id).await.expect("list");
    assert!(for_decliner.is_empty());
    let for_other = state
        .assignment
        .available(&id_of(&other.id))
        .await
        .expect("list");
    assert_eq!(for_other.len(), 1);

    // Expire the window by backdating the ledger row
    state
        .db
        .query("UPDATE order_rejection SET reofferable_after = $t WHERE courier = $courier")
        .bind(("t", now() - 1000))
        .bind(("courier", make_record_id("profile", &decliner_id)))
        .await
        .expect("backdate")
        .check()
        .expect("backdate applied");

    let for_decliner = state.assignment.available(&decliner_id).await.expect("list");
    assert_eq!(for_decliner.len(), 1, "order is offerable again");
}

#[tokio::test]
async fn second_decline_is_rejected() {
    let state = test_state().await;
    let customer = create_profile(&state, "amina", AppRole::Customer).await;
    let retailer = create_profile(&state, "youssef", AppRole::Retailer).await;
    let store = create_store(&state, &retailer, "Chez Youssef").await;
    let product = create_product(&state, &store, "Briouat", 4.0, 10).await;

    let order_id = place_order(&state, &customer, &product, 1).await;
    make_ready(&state, &order_id).await;

    let courier = create_profile(&state, "karim", AppRole::Courier).await;
    let courier_id = id_of(&courier.id);

    state
        .assignment
        .decline(&order_id, &courier_id, None)
        .await
        .expect("first decline");

    match state.assignment.decline(&order_id, &courier_id, None).await {
        Err(DeclineError::Duplicate) => {}
        other => panic!("expected Duplicate, got {other:?}"),
    }

    // Still a single ledger row
    let ledger = state
        .assignment
        .rejections_for(&courier_id)
        .await
        .expect("ledger");
    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
async fn declined_order_can_still_be_claimed_by_others() {
    let state = test_state().await;
    let customer = create_profile(&state, "amina", AppRole::Customer).await;
    let retailer = create_profile(&state, "youssef", AppRole::Retailer).await;
    let store = create_store(&state, &retailer, "Chez Youssef").await;
    let product = create_product(&state, &store, "Mint tea", 1.5, 10).await;

    let order_id = place_order(&state, &customer, &product, 1).await;
    make_ready(&state, &order_id).await;

    let decliner = create_profile(&state, "karim", AppRole::Courier).await;
    let taker = create_profile(&state, "leila", AppRole::Courier).await;

    state
        .assignment
        .decline(&order_id, &id_of(&decliner.id), None)
        .await
        .expect("decline");

    let order = state
        .assignment
        .claim(&order_id, &id_of(&taker.id))
        .await
        .expect("other courier claims fine");
    assert_eq!(order.status, OrderStatus::PickedUp);
}

#[tokio::test]
async fn claim_appends_audit_history() {
    let state = test_state().await;
    let customer = create_profile(&state, "amina", AppRole::Customer).await;
    let retailer = create_profile(&state, "youssef", AppRole::Retailer).await;
    let store = create_store(&state, &retailer, "Chez Youssef").await;
    let product = create_product(&state, &store, "Zaalouk", 5.0, 10).await;

    let order_id = place_order(&state, &customer, &product, 1).await;
    make_ready(&state, &order_id).await;

    let courier = create_profile(&state, "karim", AppRole::Courier).await;
    state
        .assignment
        .claim(&order_id, &id_of(&courier.id))
        .await
        .expect("claim");

    let history = state
        .history
        .list_for_order(&order_id)
        .await
        .expect("history");
    let claim_row = history
        .iter()
        .find(|h| h.new_status == OrderStatus::PickedUp)
        .expect("claim transition recorded");
    assert_eq!(claim_row.old_status, OrderStatus::ReadyForPickup);
    assert!(claim_row.courier.is_some());
}
