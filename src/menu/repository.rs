use sqlx::PgPool;

use crate::menu::models::{CreateMenuItem, MenuItem};

const ITEM_COLUMNS: &str =
    "id, restaurant_id, name, description, price, category, image_url, available, featured";

/// Repository for menu catalog rows
#[derive(Clone)]
pub struct MenuRepository {
    pool: PgPool,
}

impl MenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All items of a restaurant, sorted for category grouping.
    /// Optional exact category filter and case-insensitive name search.
    pub async fn list_for_restaurant(
        &self,
        restaurant_id: i32,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<MenuItem>, sqlx::Error> {
        let mut query = format!(
            "SELECT {ITEM_COLUMNS} FROM menu_items WHERE restaurant_id = $1"
        );
        if category.is_some() {
            query.push_str(" AND category = $2");
        }
        if search.is_some() {
            let idx = if category.is_some() { 3 } else { 2 };
            query.push_str(&format!(" AND name ILIKE ${idx}"));
        }
        query.push_str(" ORDER BY category, name");

        let mut q = sqlx::query_as::<_, MenuItem>(&query).bind(restaurant_id);
        if let Some(category) = category {
            q = q.bind(category.to_string());
        }
        if let Some(search) = search {
            q = q.bind(format!("%{}%", search));
        }

        q.fetch_all(&self.pool).await
    }

    /// Featured, currently-available items of a restaurant
    pub async fn featured_for_restaurant(
        &self,
        restaurant_id: i32,
    ) -> Result<Vec<MenuItem>, sqlx::Error> {
        sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM menu_items
            WHERE restaurant_id = $1 AND featured AND available
            ORDER BY name
            "#
        ))
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_by_id(
        &self,
        restaurant_id: i32,
        item_id: i32,
    ) -> Result<Option<MenuItem>, sqlx::Error> {
        sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM menu_items WHERE id = $1 AND restaurant_id = $2"
        ))
        .bind(item_id)
        .bind(restaurant_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create(
        &self,
        restaurant_id: i32,
        item: &CreateMenuItem,
    ) -> Result<MenuItem, sqlx::Error> {
        sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            INSERT INTO menu_items (restaurant_id, name, description, price, category, image_url, available, featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(restaurant_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(&item.category)
        .bind(&item.image_url)
        .bind(item.available)
        .bind(item.featured)
        .fetch_one(&self.pool)
        .await
    }

    /// Store the full (already-patched) item row
    pub async fn update(&self, item: &MenuItem) -> Result<MenuItem, sqlx::Error> {
        sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            UPDATE menu_items
            SET name = $1, description = $2, price = $3, category = $4,
                image_url = $5, available = $6, featured = $7
            WHERE id = $8
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(&item.category)
        .bind(&item.image_url)
        .bind(item.available)
        .bind(item.featured)
        .bind(item.id)
        .fetch_one(&self.pool)
        .await
    }

    /// Returns true when a row was deleted
    pub async fn delete(&self, restaurant_id: i32, item_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1 AND restaurant_id = $2")
            .bind(item_id)
            .bind(restaurant_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
