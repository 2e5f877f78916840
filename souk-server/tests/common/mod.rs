//! Shared test fixtures
//!
//! Builds a full ServerState over the in-memory engine and seeds the
//! usual cast: a customer, a retailer with a stocked store, couriers.

use souk_server::auth::JwtConfig;
use souk_server::db::DbService;
use souk_server::db::models::{Product, ProductCreate, Profile, ProfileCreate, Store, StoreCreate};
use souk_server::{Config, ServerState};
use shared::order::OrderStatus;
use shared::types::{AppRole, ProductCategory};

pub async fn test_state() -> ServerState {
    let mut config = Config::with_overrides("/tmp/souk-test", 0);
    config.jwt = JwtConfig {
        secret: "test-secret-test-secret-test-secret!".to_string(),
        expiration_minutes: 60,
        issuer: "souk-server".to_string(),
        audience: "souk-clients".to_string(),
    };
    config.rejection_cooldown_minutes = 30;
    config.delivery_earning = 5.0;

    let db = DbService::memory().await.expect("in-memory db");
    ServerState::from_db(config, db)
}

pub async fn create_profile(state: &ServerState, username: &str, role: AppRole) -> Profile {
    state
        .profiles
        .create(
            ProfileCreate {
                username: username.to_string(),
                password: "hunter2!hunter2!".to_string(),
                display_name: format!("{username} (test)"),
                phone: Some("0600000000".to_string()),
                role,
            },
            now(),
        )
        .await
        .expect("profile created")
}

pub async fn create_store(state: &ServerState, owner: &Profile, name: &str) -> Store {
    state
        .stores
        .create(
            StoreCreate {
                owner: id_of(&owner.id),
                name: name.to_string(),
                address: "1 Rue du Marché".to_string(),
            },
            now(),
        )
        .await
        .expect("store created")
}

pub async fn create_product(
    state: &ServerState,
    store: &Store,
    name: &str,
    price: f64,
    stock: i64,
) -> Product {
    state
        .products
        .create(
            ProductCreate {
                store: id_of(&store.id),
                name: name.to_string(),
                description: None,
                price,
                stock_quantity: stock,
                category: ProductCategory::Grocery,
            },
            now(),
        )
        .await
        .expect("product created")
}

/// Cart a product and check out, producing one PENDING order
pub async fn place_order(
    state: &ServerState,
    customer: &Profile,
    product: &Product,
    quantity: i64,
) -> String {
    let customer_id = id_of(&customer.id);
    state
        .carts
        .add(&customer_id, product, quantity, now())
        .await
        .expect("cart add");
    let outcome = state
        .checkout
        .checkout(&customer_id, "12 Avenue des Oliviers")
        .await
        .expect("checkout");
    assert!(outcome.failures.is_empty(), "checkout failed: {:?}", outcome.failures);
    id_of(&outcome.orders[0].order.id)
}

/// Walk a fresh order up to READY_FOR_PICKUP
pub async fn make_ready(state: &ServerState, order_id: &str) {
    for (from, to) in [
        (OrderStatus::Pending, OrderStatus::Confirmed),
        (OrderStatus::Confirmed, OrderStatus::ReadyForPickup),
    ] {
        state
            .orders
            .advance_status(order_id, from, to, None, now())
            .await
            .expect("advance query")
            .expect("order was in the expected status");
    }
}

pub fn id_of(id: &Option<surrealdb::RecordId>) -> String {
    id.as_ref().expect("record has id").to_string()
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
