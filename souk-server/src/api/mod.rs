//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`auth`] - register / login / current user
//! - [`stores`] - store management and browsing
//! - [`products`] - catalog management and browsing
//! - [`cart`] - customer cart staging
//! - [`checkout`] - cart to per-vendor orders
//! - [`orders`] - lifecycle, courier assignment, audit trail
//! - [`sync`] - resource version polling
//!
//! The courier assignment endpoints (`POST /accept-order`,
//! `POST /reject-order`) are mounted at the root, outside `/api`.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod middleware;
pub mod orders;
pub mod products;
pub mod stores;
pub mod sync;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

/// Request ID generator for the x-request-id header
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// All routes, no middleware and no state applied yet
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(stores::router())
        .merge(products::router())
        .merge(cart::router())
        .merge(checkout::router())
        .merge(orders::router())
        .merge(sync::router())
}

/// Fully configured application: routes, middleware stack, state
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}
