//! Authentication Handlers
//!
//! Registration, login and the current-user probe. Login takes a fixed
//! delay and returns one uniform error for both unknown usernames and
//! wrong passwords, so responses leak nothing about which half failed.

use std::time::Duration;

use axum::{Json, extract::State};

use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Profile, ProfileCreate};
use crate::db::repository::RepoError;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, now_millis};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

const MIN_PASSWORD_LEN: usize = 8;

/// POST /api/auth/register
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<LoginResponse>> {
    validate_required_text(&req.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.display_name, "displayName", MAX_NAME_LEN)?;
    validate_optional_text(req.phone.as_deref(), "phone", MAX_SHORT_TEXT_LEN)?;
    if req.password.len() < MIN_PASSWORD_LEN || req.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
        )));
    }

    let profile = state
        .profiles
        .create(
            ProfileCreate {
                username: req.username.trim().to_string(),
                password: req.password,
                display_name: req.display_name.trim().to_string(),
                phone: req.phone,
                role: req.role,
            },
            now_millis(),
        )
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::conflict("Username is already taken"),
            other => other.into(),
        })?;

    issue_session(&state, &profile).map(Json)
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let profile = state.profiles.find_by_username(req.username.trim()).await?;

    // Fixed delay before inspecting the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let profile = match profile {
        Some(p) => p,
        None => return Err(AppError::invalid_credentials()),
    };
    if !profile.is_active {
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let password_valid = profile
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !password_valid {
        return Err(AppError::invalid_credentials());
    }

    tracing::info!(username = %profile.username, role = %profile.role, "login");
    issue_session(&state, &profile).map(Json)
}

/// GET /api/auth/me
pub async fn me(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<UserInfo>> {
    let profile = state
        .profiles
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Profile {} not found", user.id)))?;
    Ok(Json(user_info(&profile)))
}

fn issue_session(state: &ServerState, profile: &Profile) -> AppResult<LoginResponse> {
    let info = user_info(profile);
    let token = state
        .jwt_service
        .generate_token(&info.id, &info.username, &info.display_name, info.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;
    Ok(LoginResponse { token, user: info })
}

fn user_info(profile: &Profile) -> UserInfo {
    UserInfo {
        id: profile
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default(),
        username: profile.username.clone(),
        display_name: profile.display_name.clone(),
        phone: profile.phone.clone(),
        role: profile.role,
    }
}
