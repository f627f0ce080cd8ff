use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A restaurant tenant
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
}

/// A physical table within a restaurant, addressed by its printed QR code
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DiningTable {
    pub id: i32,
    pub restaurant_id: i32,
    pub number: i32,
    pub location: Option<String>,
}

/// A bounded table visit. At most one session per table may be open
/// (`closed_at IS NULL`) at a time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: i32,
    pub restaurant_id: i32,
    pub table_id: i32,
    pub user_id: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// Response DTO for a resolved QR code
#[derive(Debug, Serialize)]
pub struct TableInfoResponse {
    pub restaurant_id: i32,
    pub restaurant_name: String,
    pub table_id: i32,
    pub table_number: i32,
    pub table_location: Option<String>,
    pub current_session_id: Option<i32>,
}

/// Request DTO for opening (or re-joining) a table session
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub restaurant_id: i32,
    pub table_id: i32,
    pub user_id: Option<i32>,
}

/// Response DTO for a started or re-joined session
#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: i32,
    pub started_at: DateTime<Utc>,
}

/// Parse the payload of a scanned table code: `{restaurant_id}|{table_number}`
pub fn parse_qr_code(code: &str) -> Option<(i32, i32)> {
    let (restaurant, table) = code.split_once('|')?;
    Some((
        restaurant.trim().parse().ok()?,
        table.trim().parse().ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qr_code_valid() {
        assert_eq!(parse_qr_code("3|12"), Some((3, 12)));
        assert_eq!(parse_qr_code(" 3 | 12 "), Some((3, 12)));
    }

    #[test]
    fn test_parse_qr_code_invalid() {
        assert_eq!(parse_qr_code("3"), None);
        assert_eq!(parse_qr_code("3|twelve"), None);
        assert_eq!(parse_qr_code(""), None);
        assert_eq!(parse_qr_code("|"), None);
    }
}
