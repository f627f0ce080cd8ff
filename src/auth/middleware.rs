// Authentication extractors for protected routes

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::warn;

use crate::auth::{error::AuthError, models::Role, token::TokenService};

/// Authenticated user extractor for protected routes
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub role: Role,
}

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)
}

fn validate_request_token(parts: &Parts) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(parts)?;

    let jwt_secret = std::env::var("JWT_SECRET")
        .map_err(|_| AuthError::ConfigError("JWT_SECRET not configured".to_string()))?;

    let token_service = TokenService::new(jwt_secret);
    let claims = token_service.validate_access_token(token)?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        role: claims.role,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        validate_request_token(parts)
    }
}

/// Extractor that additionally requires the admin role
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: i32,
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = validate_request_token(parts)?;

        if user.role != Role::Admin {
            warn!(
                "User {} attempted admin access to {} with role '{}'",
                user.user_id,
                parts.uri.path(),
                user.role
            );
            return Err(AuthError::InsufficientPermissions {
                required: Role::Admin,
                actual: user.role,
            });
        }

        Ok(AdminUser {
            user_id: user.user_id,
        })
    }
}
