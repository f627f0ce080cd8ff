use sqlx::PgPool;

use crate::tables::models::{DiningTable, Restaurant, Session};

const SESSION_COLUMNS: &str = "id, restaurant_id, table_id, user_id, started_at, closed_at";

/// Repository for restaurant and table lookups
#[derive(Clone)]
pub struct TablesRepository {
    pool: PgPool,
}

impl TablesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_restaurant(&self, id: i32) -> Result<Option<Restaurant>, sqlx::Error> {
        sqlx::query_as::<_, Restaurant>("SELECT id, name FROM restaurants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_table_by_number(
        &self,
        restaurant_id: i32,
        number: i32,
    ) -> Result<Option<DiningTable>, sqlx::Error> {
        sqlx::query_as::<_, DiningTable>(
            "SELECT id, restaurant_id, number, location FROM tables WHERE restaurant_id = $1 AND number = $2",
        )
        .bind(restaurant_id)
        .bind(number)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_table(&self, table_id: i32) -> Result<Option<DiningTable>, sqlx::Error> {
        sqlx::query_as::<_, DiningTable>(
            "SELECT id, restaurant_id, number, location FROM tables WHERE id = $1",
        )
        .bind(table_id)
        .fetch_optional(&self.pool)
        .await
    }
}

/// Repository for table sessions
#[derive(Clone)]
pub struct SessionsRepository {
    pool: PgPool,
}

impl SessionsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, session_id: i32) -> Result<Option<Session>, sqlx::Error> {
        sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"
        ))
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Most recent open session for a table, if any
    pub async fn find_open_for_table(
        &self,
        table_id: i32,
    ) -> Result<Option<Session>, sqlx::Error> {
        sqlx::query_as::<_, Session>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM sessions
            WHERE table_id = $1 AND closed_at IS NULL
            ORDER BY started_at DESC
            LIMIT 1
            "#
        ))
        .bind(table_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Open a session for a table, or return the one already open.
    /// The boolean is true when this call inserted the session and
    /// false when it re-joined an existing one.
    ///
    /// The partial unique index on (table_id) WHERE closed_at IS NULL
    /// makes concurrent opens collide; the losing insert hits
    /// ON CONFLICT DO NOTHING and the follow-up select returns the
    /// winner's row, so both callers see the same session.
    pub async fn open(
        &self,
        restaurant_id: i32,
        table_id: i32,
        user_id: Option<i32>,
    ) -> Result<(Session, bool), sqlx::Error> {
        if let Some(existing) = self.find_open_for_table(table_id).await? {
            return Ok((existing, false));
        }

        let inserted = sqlx::query_as::<_, Session>(&format!(
            r#"
            INSERT INTO sessions (restaurant_id, table_id, user_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (table_id) WHERE closed_at IS NULL DO NOTHING
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(restaurant_id)
        .bind(table_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(session) => Ok((session, true)),
            // Lost the race; the other request's session is now open
            None => match self.find_open_for_table(table_id).await? {
                Some(session) => Ok((session, false)),
                None => Err(sqlx::Error::RowNotFound),
            },
        }
    }
}
