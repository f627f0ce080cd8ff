use crate::orders::error::OrderError;
use crate::orders::repository::{CatalogRepository, OrdersRepository};
use crate::orders::{
    CreateOrderRequest, Order, OrderItemView, OrderListResponse, OrderReceipt, OrderStatus,
    OrderSummary, OrderView, Pagination, PricingPolicy, UpdateOrderRequest,
};
use crate::tables::{Session, SessionsRepository};

/// Service for order business logic: cart validation, pricing,
/// persistence, and the status state machine.
#[derive(Clone)]
pub struct OrderService {
    orders_repo: OrdersRepository,
    catalog_repo: CatalogRepository,
    sessions_repo: SessionsRepository,
    pricing: PricingPolicy,
}

/// A session can only carry orders for its own table and restaurant,
/// and only while it is open.
fn session_accepts_order(session: &Session, restaurant_id: i32, table_id: i32) -> bool {
    session.closed_at.is_none()
        && session.restaurant_id == restaurant_id
        && session.table_id == table_id
}

impl OrderService {
    pub fn new(
        orders_repo: OrdersRepository,
        catalog_repo: CatalogRepository,
        sessions_repo: SessionsRepository,
        pricing: PricingPolicy,
    ) -> Self {
        Self {
            orders_repo,
            catalog_repo,
            sessions_repo,
            pricing,
        }
    }

    /// Create a new order from a cart.
    ///
    /// The session must be open and belong to the given restaurant and
    /// table. Unit prices are resolved server-side and snapshotted onto
    /// the line items; the order and its items are persisted atomically.
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderReceipt, OrderError> {
        if request.items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let session = self
            .sessions_repo
            .find_by_id(request.session_id)
            .await?
            .ok_or(OrderError::SessionInvalid)?;

        if !session_accepts_order(&session, request.restaurant_id, request.table_id) {
            return Err(OrderError::SessionInvalid);
        }

        let item_ids: Vec<i32> = request.items.iter().map(|line| line.item_id).collect();
        let catalog = self
            .catalog_repo
            .catalog_for(request.restaurant_id, &item_ids)
            .await?;

        let priced = self.pricing.price_cart(&request.items, &catalog)?;

        let order = self
            .orders_repo
            .create_with_items(
                request.restaurant_id,
                request.table_id,
                request.session_id,
                request.user_id,
                &priced,
            )
            .await?;

        tracing::info!(
            "Created order {} for restaurant {} table {} (total {})",
            order.order_number(),
            order.restaurant_id,
            order.table_id,
            order.total
        );

        Ok(OrderReceipt::from(&order))
    }

    /// Read-only projection of an order and its items; no recomputation.
    pub async fn get_order(&self, order_id: i32) -> Result<OrderView, OrderError> {
        let order = self
            .orders_repo
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        let items = self.orders_repo.items_for(order.id).await?;

        Ok(OrderView {
            order_id: order.id,
            order_number: order.order_number(),
            status: order.status,
            subtotal: order.subtotal,
            tax: order.tax,
            total: order.total,
            items: items.into_iter().map(OrderItemView::from).collect(),
            created_at: order.created_at,
            paid_at: order.paid_at,
        })
    }

    /// Replace the cart of a pending order wholesale and recompute
    /// totals. Fails with `OrderNotEditable` once the kitchen has
    /// picked the order up.
    pub async fn update_order(
        &self,
        order_id: i32,
        request: UpdateOrderRequest,
    ) -> Result<OrderReceipt, OrderError> {
        if request.items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let order = self
            .orders_repo
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        let item_ids: Vec<i32> = request.items.iter().map(|line| line.item_id).collect();
        let catalog = self
            .catalog_repo
            .catalog_for(order.restaurant_id, &item_ids)
            .await?;

        let priced = self.pricing.price_cart(&request.items, &catalog)?;

        let updated = self.orders_repo.replace_items(order_id, &priced).await?;

        tracing::info!(
            "Replaced cart of order {} (new total {})",
            updated.order_number(),
            updated.total
        );

        Ok(OrderReceipt::from(&updated))
    }

    /// Transition an order's status. The legality check runs inside the
    /// repository transaction against the locked current row.
    pub async fn change_status(
        &self,
        order_id: i32,
        new_status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let order = self.orders_repo.update_status(order_id, new_status).await?;

        tracing::info!(
            "Order {} moved to status '{}'",
            order.order_number(),
            order.status
        );

        Ok(order)
    }

    /// Paginated staff listing of a restaurant's orders, newest first.
    /// Pages are 1-indexed; a page past the end yields an empty list.
    pub async fn list_orders(
        &self,
        restaurant_id: i32,
        status: Option<OrderStatus>,
        page: u32,
        page_size: u32,
    ) -> Result<OrderListResponse, OrderError> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);
        let offset = i64::from(page - 1) * i64::from(page_size);

        let total = self
            .orders_repo
            .count_for_restaurant(restaurant_id, status)
            .await?;

        let rows = self
            .orders_repo
            .page_for_restaurant(restaurant_id, status, i64::from(page_size), offset)
            .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.orders_repo.items_for(row.order.id).await?;
            orders.push(OrderSummary {
                order_id: row.order.id,
                order_number: row.order.order_number(),
                table_number: row.table_number,
                status: row.order.status,
                total: row.order.total,
                items: items.into_iter().map(OrderItemView::from).collect(),
                created_at: row.order.created_at,
            });
        }

        Ok(OrderListResponse {
            orders,
            pagination: Pagination::new(total, page, page_size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn open_session() -> Session {
        Session {
            id: 5,
            restaurant_id: 1,
            table_id: 3,
            user_id: None,
            started_at: Utc::now(),
            closed_at: None,
        }
    }

    #[test]
    fn test_open_matching_session_accepts_order() {
        assert!(session_accepts_order(&open_session(), 1, 3));
    }

    #[test]
    fn test_closed_session_rejects_order() {
        let mut session = open_session();
        session.closed_at = Some(Utc::now());
        assert!(!session_accepts_order(&session, 1, 3));
    }

    #[test]
    fn test_session_for_other_table_rejects_order() {
        assert!(!session_accepts_order(&open_session(), 1, 4));
    }

    #[test]
    fn test_session_for_other_restaurant_rejects_order() {
        assert!(!session_accepts_order(&open_session(), 2, 3));
    }
}
