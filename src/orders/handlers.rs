// HTTP handlers for order endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::orders::{
    CreateOrderRequest, Order, OrderError, OrderListResponse, OrderReceipt, OrderStatus,
    OrderView, UpdateOrderRequest, UpdateStatusRequest,
};
use crate::AppState;

/// Query parameters for the staff order board
#[derive(Debug, Deserialize)]
pub struct OrderBoardQuery {
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Handler for POST /api/orders
/// Creates a new order from a cart within an open table session
pub async fn create_order_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderReceipt>), OrderError> {
    request
        .validate()
        .map_err(|e| OrderError::ValidationError(e.to_string()))?;

    let receipt = state.order_service.create_order(request).await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Handler for GET /api/orders/{order_id}
pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
) -> Result<Json<OrderView>, OrderError> {
    let view = state.order_service.get_order(order_id).await?;
    Ok(Json(view))
}

/// Handler for PUT /api/orders/{order_id}
/// Replaces the cart of a pending order and recomputes totals
pub async fn update_order_handler(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<OrderReceipt>, OrderError> {
    request
        .validate()
        .map_err(|e| OrderError::ValidationError(e.to_string()))?;

    let receipt = state.order_service.update_order(order_id, request).await?;

    Ok(Json(receipt))
}

/// Handler for GET /api/admin/restaurants/{restaurant_id}/orders
/// Paginated order board for staff, newest orders first
pub async fn list_orders_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(restaurant_id): Path<i32>,
    Query(query): Query<OrderBoardQuery>,
) -> Result<Json<OrderListResponse>, OrderError> {
    let response = state
        .order_service
        .list_orders(
            restaurant_id,
            query.status,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(20),
        )
        .await?;

    Ok(Json(response))
}

/// Handler for PUT /api/admin/orders/{order_id}/status
/// Staff-initiated status transition, validated against the state machine
pub async fn update_status_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(order_id): Path<i32>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, OrderError> {
    if let Some(minutes) = request.estimated_minutes {
        // Informational only; surfaced to the kitchen display, not stored
        tracing::debug!("Order {}: staff estimated {} minutes", order_id, minutes);
    }

    let order = state
        .order_service
        .change_status(order_id, request.status)
        .await?;

    Ok(Json(order))
}
