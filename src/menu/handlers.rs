// HTTP handlers for the public menu and the admin catalog CRUD

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::error::ApiError;
use crate::menu::models::{
    group_by_category, CreateMenuItem, FeaturedResponse, MenuItem, MenuResponse, UpdateMenuItem,
};
use crate::AppState;

/// Query parameters for the public menu
#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Handler for GET /api/restaurants/{restaurant_id}/menu
/// Returns the menu grouped by category
#[utoipa::path(
    get,
    path = "/api/restaurants/{restaurant_id}/menu",
    params(
        ("restaurant_id" = i32, Path, description = "Restaurant ID"),
        ("category" = Option<String>, Query, description = "Exact category filter"),
        ("search" = Option<String>, Query, description = "Case-insensitive name search")
    ),
    responses(
        (status = 200, description = "Menu grouped by category", body = MenuResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "menu"
)]
pub async fn get_menu_handler(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i32>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<MenuResponse>, ApiError> {
    let items = state
        .menu_repo
        .list_for_restaurant(
            restaurant_id,
            query.category.as_deref(),
            query.search.as_deref(),
        )
        .await?;

    tracing::debug!(
        "Menu query for restaurant {} returned {} items",
        restaurant_id,
        items.len()
    );

    Ok(Json(MenuResponse {
        categories: group_by_category(items),
    }))
}

/// Handler for GET /api/restaurants/{restaurant_id}/featured
#[utoipa::path(
    get,
    path = "/api/restaurants/{restaurant_id}/featured",
    params(
        ("restaurant_id" = i32, Path, description = "Restaurant ID")
    ),
    responses(
        (status = 200, description = "Featured available items", body = FeaturedResponse)
    ),
    tag = "menu"
)]
pub async fn get_featured_handler(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i32>,
) -> Result<Json<FeaturedResponse>, ApiError> {
    let featured_items = state.menu_repo.featured_for_restaurant(restaurant_id).await?;

    Ok(Json(FeaturedResponse { featured_items }))
}

/// Handler for GET /api/admin/menu/{restaurant_id}
#[utoipa::path(
    get,
    path = "/api/admin/menu/{restaurant_id}",
    params(
        ("restaurant_id" = i32, Path, description = "Restaurant ID")
    ),
    responses(
        (status = 200, description = "All catalog items", body = Vec<MenuItem>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "admin_menu"
)]
pub async fn admin_list_menu_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(restaurant_id): Path<i32>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    let items = state
        .menu_repo
        .list_for_restaurant(restaurant_id, None, None)
        .await?;

    Ok(Json(items))
}

/// Handler for POST /api/admin/menu/{restaurant_id}
#[utoipa::path(
    post,
    path = "/api/admin/menu/{restaurant_id}",
    params(
        ("restaurant_id" = i32, Path, description = "Restaurant ID")
    ),
    request_body = CreateMenuItem,
    responses(
        (status = 201, description = "Item created", body = MenuItem),
        (status = 400, description = "Invalid input data")
    ),
    tag = "admin_menu"
)]
pub async fn admin_create_item_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(restaurant_id): Path<i32>,
    Json(payload): Json<CreateMenuItem>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    payload.validate()?;

    let item = state.menu_repo.create(restaurant_id, &payload).await?;

    tracing::info!(
        "Created menu item {} '{}' for restaurant {}",
        item.id,
        item.name,
        restaurant_id
    );

    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for PUT /api/admin/menu/{restaurant_id}/{item_id}
/// Partial update: only supplied fields change
#[utoipa::path(
    put,
    path = "/api/admin/menu/{restaurant_id}/{item_id}",
    params(
        ("restaurant_id" = i32, Path, description = "Restaurant ID"),
        ("item_id" = i32, Path, description = "Menu item ID")
    ),
    request_body = UpdateMenuItem,
    responses(
        (status = 200, description = "Item updated", body = MenuItem),
        (status = 404, description = "Item not found")
    ),
    tag = "admin_menu"
)]
pub async fn admin_update_item_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((restaurant_id, item_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateMenuItem>,
) -> Result<Json<MenuItem>, ApiError> {
    payload.validate()?;

    let existing = state
        .menu_repo
        .find_by_id(restaurant_id, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "MenuItem".to_string(),
            id: item_id.to_string(),
        })?;

    let updated = state.menu_repo.update(&payload.apply_to(existing)).await?;

    tracing::info!("Updated menu item {} for restaurant {}", item_id, restaurant_id);

    Ok(Json(updated))
}

/// Handler for DELETE /api/admin/menu/{restaurant_id}/{item_id}
#[utoipa::path(
    delete,
    path = "/api/admin/menu/{restaurant_id}/{item_id}",
    params(
        ("restaurant_id" = i32, Path, description = "Restaurant ID"),
        ("item_id" = i32, Path, description = "Menu item ID")
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found")
    ),
    tag = "admin_menu"
)]
pub async fn admin_delete_item_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((restaurant_id, item_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.menu_repo.delete(restaurant_id, item_id).await?;

    if !deleted {
        return Err(ApiError::NotFound {
            resource: "MenuItem".to_string(),
            id: item_id.to_string(),
        });
    }

    tracing::info!("Deleted menu item {} from restaurant {}", item_id, restaurant_id);

    Ok(StatusCode::NO_CONTENT)
}
