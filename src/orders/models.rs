use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Order status enum representing the lifecycle of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Served,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Served => "served",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        }
    }

}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing an order row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i32,
    pub restaurant_id: i32,
    pub table_id: i32,
    pub session_id: i32,
    pub user_id: Option<i32>,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Display-formatted order number, derived from the id.
    pub fn order_number(&self) -> String {
        format!("#{:06}", self.id)
    }
}

/// Domain model representing a line item within an order.
/// `unit_price` is a snapshot taken at order-creation time and never
/// re-read from the menu.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub menu_item_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub special_instructions: Option<String>,
}

/// A single cart line as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CartLine {
    pub item_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub special_instructions: Option<String>,
}

/// Request DTO for creating a new order
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub restaurant_id: i32,
    pub table_id: i32,
    pub session_id: i32,
    pub user_id: Option<i32>,
    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    pub items: Vec<CartLine>,
}

/// Request DTO for replacing the cart of a pending order
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    pub items: Vec<CartLine>,
}

/// Request DTO for a staff-initiated status change.
/// `estimated_minutes` is informational only and not persisted.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
    pub estimated_minutes: Option<i32>,
}

/// Server-computed totals for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Response DTO returned by order creation and cart updates
#[derive(Debug, Serialize)]
pub struct OrderReceipt {
    pub order_id: i32,
    pub order_number: String,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderReceipt {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            order_number: order.order_number(),
            status: order.status,
            subtotal: order.subtotal,
            tax: order.tax,
            total: order.total,
            created_at: order.created_at,
        }
    }
}

/// Response DTO for order item
#[derive(Debug, Serialize)]
pub struct OrderItemView {
    pub menu_item_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub special_instructions: Option<String>,
}

impl From<OrderItem> for OrderItemView {
    fn from(item: OrderItem) -> Self {
        Self {
            menu_item_id: item.menu_item_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            special_instructions: item.special_instructions,
        }
    }
}

/// Read-only projection of an order and its items
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub order_id: i32,
    pub order_number: String,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub items: Vec<OrderItemView>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Summary row for the staff order board, with the table number
/// denormalized for display.
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub order_id: i32,
    pub order_number: String,
    pub table_number: i32,
    pub status: OrderStatus,
    pub total: Decimal,
    pub items: Vec<OrderItemView>,
    pub created_at: DateTime<Utc>,
}

/// Pagination metadata for order listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub current_page: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// Compute pagination metadata. Pages are 1-indexed;
    /// `total_pages = ceil(total / page_size)`.
    pub fn new(total: i64, current_page: u32, page_size: u32) -> Self {
        let total_pages = if total <= 0 {
            0
        } else {
            ((total + i64::from(page_size) - 1) / i64::from(page_size)) as u32
        };
        Self {
            total,
            current_page,
            total_pages,
        }
    }
}

/// Response DTO for the admin order listing
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderSummary>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_order(id: i32) -> Order {
        Order {
            id,
            restaurant_id: 1,
            table_id: 1,
            session_id: 1,
            user_id: None,
            status: OrderStatus::Pending,
            subtotal: dec!(10.00),
            tax: dec!(1.00),
            total: dec!(11.00),
            created_at: Utc::now(),
            paid_at: None,
        }
    }

    #[test]
    fn test_order_number_is_zero_padded() {
        assert_eq!(sample_order(42).order_number(), "#000042");
    }

    #[test]
    fn test_order_number_wide_id_is_not_truncated() {
        assert_eq!(sample_order(1234567).order_number(), "#1234567");
    }

    #[test]
    fn test_status_round_trips_through_serde() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Served,
            OrderStatus::Paid,
            OrderStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let parsed: OrderStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, status);
        }
        assert!(serde_json::from_str::<OrderStatus>("\"delivered\"").is_err());
    }

    #[test]
    fn test_status_serde_is_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap();
        assert_eq!(json, "\"preparing\"");
        let parsed: OrderStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(parsed, OrderStatus::Paid);
    }

    #[test]
    fn test_receipt_carries_computed_totals() {
        let order = sample_order(7);
        let receipt = OrderReceipt::from(&order);
        assert_eq!(receipt.order_number, "#000007");
        assert_eq!(receipt.subtotal, dec!(10.00));
        assert_eq!(receipt.tax, dec!(1.00));
        assert_eq!(receipt.total, dec!(11.00));
    }

    #[test]
    fn test_pagination_forty_five_orders_page_size_twenty() {
        let p = Pagination::new(45, 1, 20);
        assert_eq!(p.total_pages, 3);
        let p = Pagination::new(45, 4, 20);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.current_page, 4);
    }

    #[test]
    fn test_pagination_exact_multiple() {
        let p = Pagination::new(40, 2, 20);
        assert_eq!(p.total_pages, 2);
    }

    #[test]
    fn test_pagination_empty() {
        let p = Pagination::new(0, 1, 20);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.total, 0);
    }

    #[test]
    fn test_create_order_request_rejects_empty_cart() {
        let request = CreateOrderRequest {
            restaurant_id: 1,
            table_id: 1,
            session_id: 1,
            user_id: None,
            items: vec![],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_cart_line_rejects_zero_quantity() {
        let line = CartLine {
            item_id: 1,
            quantity: 0,
            special_instructions: None,
        };
        assert!(line.validate().is_err());
    }
}
