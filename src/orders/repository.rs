use std::collections::HashMap;

use chrono::Utc;
use sqlx::{FromRow, PgPool};

use crate::orders::error::OrderError;
use crate::orders::pricing::{CatalogEntry, PricedCart};
use crate::orders::{Order, OrderItem, OrderStatus, StatusMachine};

const ORDER_COLUMNS: &str =
    "id, restaurant_id, table_id, session_id, user_id, status, subtotal, tax, total, created_at, paid_at";

/// Repository for menu-item lookups made by the order engine
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch price and availability for the given items of one restaurant.
    /// Items belonging to other restaurants are simply absent from the map.
    pub async fn catalog_for(
        &self,
        restaurant_id: i32,
        item_ids: &[i32],
    ) -> Result<HashMap<i32, CatalogEntry>, OrderError> {
        let rows: Vec<(i32, rust_decimal::Decimal, bool)> = sqlx::query_as(
            "SELECT id, price, available FROM menu_items WHERE restaurant_id = $1 AND id = ANY($2)",
        )
        .bind(restaurant_id)
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, price, available)| (id, CatalogEntry { price, available }))
            .collect())
    }
}

/// An order joined with its table number, for the staff order board
#[derive(Debug, FromRow)]
pub struct OrderWithTable {
    #[sqlx(flatten)]
    pub order: Order,
    pub table_number: i32,
}

/// Repository for order rows and their line items
#[derive(Clone)]
pub struct OrdersRepository {
    pool: PgPool,
}

impl OrdersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order and all of its line items in one transaction.
    /// Either every row is written or none are; a failure on any line
    /// item insert rolls back the order row as well.
    pub async fn create_with_items(
        &self,
        restaurant_id: i32,
        table_id: i32,
        session_id: i32,
        user_id: Option<i32>,
        priced: &PricedCart,
    ) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (restaurant_id, table_id, session_id, user_id, status, subtotal, tax, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(restaurant_id)
        .bind(table_id)
        .bind(session_id)
        .bind(user_id)
        .bind(OrderStatus::Pending)
        .bind(priced.totals.subtotal)
        .bind(priced.totals.tax)
        .bind(priced.totals.total)
        .fetch_one(&mut *tx)
        .await?;

        for line in &priced.lines {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, menu_item_id, quantity, unit_price, special_instructions)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order.id)
            .bind(line.item_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(&line.special_instructions)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order)
    }

    pub async fn find_by_id(&self, order_id: i32) -> Result<Option<Order>, OrderError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn items_for(&self, order_id: i32) -> Result<Vec<OrderItem>, OrderError> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, menu_item_id, quantity, unit_price, special_instructions
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Replace the line items of a pending order and store recomputed
    /// totals. The pending check, the delete and the re-insert share one
    /// transaction; the order row is locked so a concurrent status change
    /// cannot slip in between check and write.
    pub async fn replace_items(
        &self,
        order_id: i32,
        priced: &PricedCart,
    ) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(OrderError::NotFound)?;

        if current.status != OrderStatus::Pending {
            return Err(OrderError::OrderNotEditable(current.status));
        }

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        for line in &priced.lines {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, menu_item_id, quantity, unit_price, special_instructions)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order_id)
            .bind(line.item_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(&line.special_instructions)
            .execute(&mut *tx)
            .await?;
        }

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET subtotal = $1, tax = $2, total = $3
            WHERE id = $4
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(priced.totals.subtotal)
        .bind(priced.totals.tax)
        .bind(priced.totals.total)
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// Transition an order's status. Read-check-write happens inside one
    /// transaction with the row locked, so two concurrent transitions
    /// cannot both validate against the same stale status. Reaching
    /// `paid` stamps `paid_at`; no other transition touches it.
    pub async fn update_status(
        &self,
        order_id: i32,
        new_status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(OrderError::NotFound)?;

        StatusMachine::transition(current.status, new_status)?;

        let paid_at = if new_status == OrderStatus::Paid {
            Some(Utc::now())
        } else {
            current.paid_at
        };

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET status = $1, paid_at = $2
            WHERE id = $3
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(new_status)
        .bind(paid_at)
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// Count orders matching the restaurant and optional status filter
    pub async fn count_for_restaurant(
        &self,
        restaurant_id: i32,
        status: Option<OrderStatus>,
    ) -> Result<i64, OrderError> {
        let count: i64 = match status {
            Some(status_filter) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM orders WHERE restaurant_id = $1 AND status = $2",
                )
                .bind(restaurant_id)
                .bind(status_filter)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE restaurant_id = $1")
                    .bind(restaurant_id)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }

    /// One page of orders for a restaurant, newest first. Ties on
    /// created_at are broken by id descending so paging is stable.
    pub async fn page_for_restaurant(
        &self,
        restaurant_id: i32,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderWithTable>, OrderError> {
        let rows = match status {
            Some(status_filter) => {
                sqlx::query_as::<_, OrderWithTable>(
                    r#"
                    SELECT o.id, o.restaurant_id, o.table_id, o.session_id, o.user_id,
                           o.status, o.subtotal, o.tax, o.total, o.created_at, o.paid_at,
                           t.number AS table_number
                    FROM orders o
                    JOIN tables t ON t.id = o.table_id
                    WHERE o.restaurant_id = $1 AND o.status = $2
                    ORDER BY o.created_at DESC, o.id DESC
                    LIMIT $3 OFFSET $4
                    "#,
                )
                .bind(restaurant_id)
                .bind(status_filter)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderWithTable>(
                    r#"
                    SELECT o.id, o.restaurant_id, o.table_id, o.session_id, o.user_id,
                           o.status, o.subtotal, o.tax, o.total, o.created_at, o.paid_at,
                           t.number AS table_number
                    FROM orders o
                    JOIN tables t ON t.id = o.table_id
                    WHERE o.restaurant_id = $1
                    ORDER BY o.created_at DESC, o.id DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(restaurant_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }
}
