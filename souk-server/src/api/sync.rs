//! Sync API
//!
//! Poll endpoint replacing push notifications: clients compare the
//! returned counters with what they last saw and re-fetch the resources
//! that moved.

use std::collections::HashMap;

use axum::{Json, Router, extract::State, routing::get};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/sync/versions", get(versions))
}

/// GET /api/sync/versions
async fn versions(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<Json<HashMap<String, u64>>> {
    Ok(Json(state.resource_versions.snapshot()))
}
