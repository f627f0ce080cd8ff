// JWT token generation and validation service

use crate::auth::error::AuthError;
use crate::auth::models::Role;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user_id
    pub role: Role,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// Token service for JWT operations
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    access_token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService with secret key.
    /// Access tokens expire in 24 hours, long enough to cover a dining
    /// session without forcing guests to re-authenticate mid-meal.
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            access_token_duration: 86_400, // 24 hours
        }
    }

    /// Generate an access token for a user
    pub fn generate_access_token(&self, user_id: i32, role: Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let exp = now + self.access_token_duration;

        let claims = Claims {
            sub: user_id,
            role,
            iat: now,
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Validate an access token and return its claims
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes".to_string())
    }

    #[test]
    fn test_token_round_trip_preserves_identity() {
        let service = test_token_service();
        let token = service.generate_access_token(42, Role::User).unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn test_access_token_expiration_is_24_hours() {
        let service = test_token_service();
        let token = service.generate_access_token(1, Role::Admin).unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn test_token_with_wrong_secret_is_invalid() {
        let service = test_token_service();
        let other = TokenService::new("a_completely_different_secret".to_string());

        let token = service.generate_access_token(1, Role::User).unwrap();
        assert!(matches!(
            other.validate_access_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let service = test_token_service();
        assert!(matches!(
            service.validate_access_token("not.a.jwt"),
            Err(AuthError::InvalidToken)
        ));
    }
}
