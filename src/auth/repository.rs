// Database repository for user accounts

use crate::auth::{
    error::AuthError,
    models::{Role, User},
};
use sqlx::PgPool;

const USER_COLUMNS: &str = "id, name, email, password_hash, phone, is_guest, role, created_at";

/// User repository for database operations
#[derive(Clone)]
pub struct UsersRepository {
    pool: PgPool,
}

impl UsersRepository {
    /// Create a new UsersRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a registered user with credentials
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        phone: Option<&str>,
    ) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash, phone, is_guest, role) \
             VALUES ($1, $2, $3, $4, FALSE, $5) RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(phone)
        .bind(Role::User)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Unique constraint on email
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::EmailAlreadyExists;
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    /// Create an anonymous guest account with no credentials
    pub async fn create_guest(&self) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (is_guest, role) VALUES (TRUE, $1) RETURNING {USER_COLUMNS}"
        ))
        .bind(Role::User)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AuthError> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }
}
