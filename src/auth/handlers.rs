// HTTP handlers for registration, login, and guest access

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    models::{AuthResponse, GuestResponse, LoginRequest, RegisterRequest},
    password::PasswordService,
};
use crate::AppState;

/// Handler for POST /api/auth/register
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    payload
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    if state.users_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AuthError::EmailAlreadyExists);
    }

    let password_hash = PasswordService::hash_password(&payload.password)?;

    let user = state
        .users_repo
        .create_user(
            &payload.name,
            &payload.email,
            &password_hash,
            payload.phone.as_deref(),
        )
        .await?;

    let token = state.token_service.generate_access_token(user.id, user.role)?;

    tracing::info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user_id: user.id,
            token,
        }),
    ))
}

/// Handler for POST /api/auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    payload
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    let user = state
        .users_repo
        .find_by_email(&payload.email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    // Guests have no password hash
    let hash = user
        .password_hash
        .as_deref()
        .ok_or(AuthError::InvalidCredentials)?;

    if !PasswordService::verify_password(&payload.password, hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    let token = state.token_service.generate_access_token(user.id, user.role)?;

    tracing::info!("User {} logged in", user.id);

    Ok(Json(AuthResponse {
        user_id: user.id,
        token,
    }))
}

/// Handler for POST /api/auth/guest
/// Creates a throwaway account so a diner can order without registering
pub async fn guest_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<GuestResponse>), AuthError> {
    let user = state.users_repo.create_guest().await?;

    let token = state.token_service.generate_access_token(user.id, user.role)?;

    tracing::info!("Created guest account {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(GuestResponse {
            guest_id: user.id,
            token,
        }),
    ))
}
