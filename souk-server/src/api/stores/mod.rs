//! Store API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stores", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/mine", get(handler::mine))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/products", get(handler::list_products))
}
