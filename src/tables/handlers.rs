// HTTP handlers for table lookup and session bootstrap

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::tables::models::{
    parse_qr_code, StartSessionRequest, StartSessionResponse, TableInfoResponse,
};
use crate::AppState;

/// Query parameters for QR code resolution
#[derive(Debug, Deserialize)]
pub struct TableInfoQuery {
    pub qr_code: String,
}

/// Handler for GET /api/table/info?qr_code=...
/// Resolves a scanned code to its restaurant, table and open session
pub async fn table_info_handler(
    State(state): State<AppState>,
    Query(query): Query<TableInfoQuery>,
) -> Result<Json<TableInfoResponse>, ApiError> {
    let (restaurant_id, table_number) = parse_qr_code(&query.qr_code).ok_or_else(|| {
        ApiError::BadRequest {
            message: format!("Malformed table code '{}'", query.qr_code),
        }
    })?;

    let restaurant = state
        .tables_repo
        .find_restaurant(restaurant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Restaurant".to_string(),
            id: restaurant_id.to_string(),
        })?;

    let table = state
        .tables_repo
        .find_table_by_number(restaurant.id, table_number)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Table".to_string(),
            id: table_number.to_string(),
        })?;

    let session = state.sessions_repo.find_open_for_table(table.id).await?;

    Ok(Json(TableInfoResponse {
        restaurant_id: restaurant.id,
        restaurant_name: restaurant.name,
        table_id: table.id,
        table_number: table.number,
        table_location: table.location,
        current_session_id: session.map(|s| s.id),
    }))
}

/// Handler for POST /api/table/session
/// Opens a session for a table (201), or returns the already-open
/// one (200)
pub async fn start_session_handler(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<StartSessionResponse>), ApiError> {
    let table = state
        .tables_repo
        .find_table(request.table_id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Table".to_string(),
            id: request.table_id.to_string(),
        })?;

    if table.restaurant_id != request.restaurant_id {
        return Err(ApiError::BadRequest {
            message: "Table does not belong to this restaurant".to_string(),
        });
    }

    let (session, created) = state
        .sessions_repo
        .open(request.restaurant_id, request.table_id, request.user_id)
        .await?;

    tracing::debug!(
        "Session {} {} for table {} (restaurant {})",
        session.id,
        if created { "opened" } else { "re-joined" },
        session.table_id,
        session.restaurant_id
    );

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(StartSessionResponse {
            session_id: session.id,
            started_at: session.started_at,
        }),
    ))
}
