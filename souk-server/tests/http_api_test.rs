//! HTTP surface tests
//!
//! Drive the assembled router with tower::oneshot and pin down the
//! exact wire shapes of the assignment endpoints, which external courier
//! clients parse field by field.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::*;
use serde_json::{Value, json};
use shared::types::AppRole;
use souk_server::api::build_app;
use souk_server::db::models::Profile;
use souk_server::ServerState;
use tower::ServiceExt;

fn token_for(state: &ServerState, profile: &Profile) -> String {
    state
        .jwt_service
        .generate_token(
            &id_of(&profile.id),
            &profile.username,
            &profile.display_name,
            profile.role,
        )
        .expect("token")
}

fn post_json(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn setup_ready_order(state: &ServerState) -> String {
    let customer = create_profile(state, "amina", AppRole::Customer).await;
    let retailer = create_profile(state, "youssef", AppRole::Retailer).await;
    let store = create_store(state, &retailer, "Chez Youssef").await;
    let product = create_product(state, &store, "Tagine", 15.0, 10).await;
    let order_id = place_order(state, &customer, &product, 1).await;
    make_ready(state, &order_id).await;
    order_id
}

#[tokio::test]
async fn accept_order_success_shape() {
    let state = test_state().await;
    let order_id = setup_ready_order(&state).await;
    let courier = create_profile(&state, "karim", AppRole::Courier).await;
    let token = token_for(&state, &courier);
    let app = build_app(state);

    let response = app
        .oneshot(post_json("/accept-order", &token, json!({ "orderId": order_id })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["orderId"].as_str(), Some(order_id.as_str()));
    assert_eq!(body["status"], "PICKED_UP");
    assert_eq!(body["assignedTo"]["id"].as_str(), Some(id_of(&courier.id).as_str()));
    assert_eq!(body["assignedTo"]["name"], courier.display_name);
    assert!(body["assignedAt"].as_i64().is_some());
    assert_eq!(body["storeName"], "Chez Youssef");
    assert_eq!(body["deliveryAddress"], "12 Avenue des Oliviers");
    assert_eq!(body["deliveryEarning"].as_f64(), Some(5.0));
    assert!(body["customerName"].is_string());
    assert!(body["customerPhone"].is_string());
}

#[tokio::test]
async fn second_accept_gets_conflict_naming_the_winner() {
    let state = test_state().await;
    let order_id = setup_ready_order(&state).await;
    let winner = create_profile(&state, "karim", AppRole::Courier).await;
    let loser = create_profile(&state, "leila", AppRole::Courier).await;
    let winner_token = token_for(&state, &winner);
    let loser_token = token_for(&state, &loser);
    let app = build_app(state);

    let response = app
        .clone()
        .oneshot(post_json("/accept-order", &winner_token, json!({ "orderId": order_id })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json("/accept-order", &loser_token, json!({ "orderId": order_id })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["error"], "OrderAlreadyAssigned");
    assert_eq!(body["assignedTo"]["name"], winner.display_name);
    assert!(body["assignedAt"].as_i64().is_some());
}

#[tokio::test]
async fn reject_order_reports_the_cooldown_window() {
    let state = test_state().await;
    let order_id = setup_ready_order(&state).await;
    let courier = create_profile(&state, "karim", AppRole::Courier).await;
    let token = token_for(&state, &courier);
    let app = build_app(state);

    let response = app
        .clone()
        .oneshot(post_json(
            "/reject-order",
            &token,
            json!({ "orderId": order_id, "reason": "too far" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["orderId"].as_str(), Some(order_id.as_str()));
    let rejected_at = body["rejectedAt"].as_i64().expect("rejectedAt");
    let reofferable_after = body["reofferableAfter"].as_i64().expect("reofferableAfter");
    // 30 minute cooldown
    assert_eq!(reofferable_after - rejected_at, 30 * 60 * 1000);

    // Declining twice is a conflict
    let response = app
        .oneshot(post_json("/reject-order", &token, json!({ "orderId": order_id })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn claiming_an_unready_order_is_not_found() {
    let state = test_state().await;
    let customer = create_profile(&state, "amina", AppRole::Customer).await;
    let retailer = create_profile(&state, "youssef", AppRole::Retailer).await;
    let store = create_store(&state, &retailer, "Chez Youssef").await;
    let product = create_product(&state, &store, "Tagine", 15.0, 10).await;
    // Still PENDING, never readied
    let order_id = place_order(&state, &customer, &product, 1).await;
    let courier = create_profile(&state, "karim", AppRole::Courier).await;
    let token = token_for(&state, &courier);
    let app = build_app(state.clone());

    let response = app
        .oneshot(post_json("/accept-order", &token, json!({ "orderId": order_id })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // And the row is untouched
    let order = state
        .orders
        .find_by_id(&order_id)
        .await
        .expect("read back")
        .expect("order exists");
    assert!(order.courier.is_none());
}

#[tokio::test]
async fn assignment_endpoints_require_the_courier_role() {
    let state = test_state().await;
    let order_id = setup_ready_order(&state).await;
    let customer = state
        .profiles
        .find_by_username("amina")
        .await
        .expect("query")
        .expect("seeded customer");
    let token = token_for(&state, &customer);
    let app = build_app(state);

    let response = app
        .oneshot(post_json("/accept-order", &token, json!({ "orderId": order_id })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let state = test_state().await;
    let app = build_app(state);

    let request = Request::builder()
        .method("POST")
        .uri("/accept-order")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "orderId": "order:x" }).to_string()))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let state = test_state().await;
    let app = build_app(state);

    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_login_and_me_round_trip() {
    let state = test_state().await;
    let app = build_app(state);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "username": "nadia",
                "password": "correct-horse-battery",
                "displayName": "Nadia",
                "phone": "0611111111",
                "role": "customer"
            })
            .to_string(),
        ))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["token"].as_str().expect("token").to_string();
    assert_eq!(body["user"]["role"], "customer");

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "nadia");
    assert_eq!(body["displayName"], "Nadia");
}

#[tokio::test]
async fn unknown_role_in_registration_is_rejected() {
    let state = test_state().await;
    let app = build_app(state);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "username": "eve",
                "password": "correct-horse-battery",
                "displayName": "Eve",
                "role": "admin"
            })
            .to_string(),
        ))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    // Closed role set: deserialization refuses unknown variants
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
