use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::orders::OrderStatus;

/// Error types for order operations
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Order not found")]
    NotFound,

    #[error("Menu item {0} is unavailable")]
    ItemUnavailable(i32),

    #[error("Order must contain at least one item")]
    EmptyCart,

    #[error("Session is closed or does not belong to this table")]
    SessionInvalid,

    #[error("Order is not editable in status '{0}'")]
    OrderNotEditable(OrderStatus),

    #[error("Invalid status transition from '{from}' to '{to}'")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            OrderError::DatabaseError(msg) => {
                tracing::error!("Database error in orders: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
            }
            OrderError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            OrderError::ItemUnavailable(_) => (StatusCode::BAD_REQUEST, "ITEM_UNAVAILABLE"),
            OrderError::EmptyCart => (StatusCode::BAD_REQUEST, "EMPTY_CART"),
            OrderError::SessionInvalid => (StatusCode::BAD_REQUEST, "SESSION_INVALID"),
            OrderError::OrderNotEditable(_) => (StatusCode::CONFLICT, "ORDER_NOT_EDITABLE"),
            OrderError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            OrderError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        };

        // Database detail stays in the logs, not in the response body
        let message = match &self {
            OrderError::DatabaseError(_) => "A database error occurred".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error_code": error_code,
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_names_both_statuses() {
        let err = OrderError::InvalidTransition {
            from: OrderStatus::Paid,
            to: OrderStatus::Preparing,
        };
        let msg = err.to_string();
        assert!(msg.contains("paid"));
        assert!(msg.contains("preparing"));
    }

    #[test]
    fn test_item_unavailable_names_the_item() {
        let err = OrderError::ItemUnavailable(17);
        assert!(err.to_string().contains("17"));
    }
}
