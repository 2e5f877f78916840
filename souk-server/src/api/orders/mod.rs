//! Order API module
//!
//! The courier assignment endpoints live at the root of the surface
//! (`POST /accept-order`, `POST /reject-order`); everything else is
//! under `/api/orders`.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/accept-order", post(handler::accept_order))
        .route("/reject-order", post(handler::reject_order))
        .nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Fixed segments before /{id} to avoid path capture
        .route("/available", get(handler::available))
        .route("/mine", get(handler::mine))
        .route("/deliveries", get(handler::deliveries))
        .route("/store", get(handler::store_orders))
        .route("/rejections", get(handler::my_rejections))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/items", get(handler::items))
        .route("/{id}/history", get(handler::history))
        .route("/{id}/status", put(handler::update_status))
}
