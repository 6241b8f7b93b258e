//! Persistence port and its PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::user::{NewUser, User};

pub const DEFAULT_CREDENTIALS: &str = "postgres";
pub const DEFAULT_DATABASE_NAME: &str = "userhub";
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// One page of users plus listing totals.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserPage {
    pub items: Vec<User>,
    pub total_count: i64,
    pub total_pages: i64,
}

/// Persistence operations the handlers need.
///
/// Object-safe so the router can run against PostgreSQL or the in-memory
/// store. Pages are ordered by `(login, id)`, a stable key.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Load a user by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    /// Insert a new user. The store assigns the identifier.
    async fn insert(&self, user: NewUser) -> Result<User>;
    /// Update the row matching `user.id`, or insert it.
    /// Returns `true` when a row was inserted.
    async fn update_or_insert(&self, user: &User) -> Result<bool>;
    /// Update an existing user by primary key.
    async fn update(&self, user: &User) -> Result<()>;
    /// Delete by id.
    async fn delete(&self, id: Uuid) -> Result<()>;
    /// Fetch one page. `page_number` starts at 1; both arguments must
    /// already be normalized by the caller.
    async fn get_page(&self, page_number: i64, page_size: i64) -> Result<UserPage>;
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new [`PgUserStore`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open the connection pool.
    pub async fn connect(
        hostname: &str,
        username: &str,
        password: &str,
        db: &str,
        pool: u32,
    ) -> std::result::Result<Self, sqlx::Error> {
        let addr = format!("postgres://{username}:{password}@{hostname}/{db}");
        let pool = PgPoolOptions::new().max_connections(pool);
        let postgres = pool.connect(&addr).await?;

        tracing::info!(%hostname, %db, "postgres connected");

        Ok(Self::new(postgres))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, login, first_name, last_name FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            login: user.login,
            first_name: user.first_name,
            last_name: user.last_name,
        };

        sqlx::query(
            r#"INSERT INTO users (id, login, first_name, last_name)
                VALUES ($1, $2, $3, $4)"#,
        )
        .bind(user.id)
        .bind(&user.login)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_or_insert(&self, user: &User) -> Result<bool> {
        // Single statement, so concurrent upserts cannot race.
        // `xmax = 0` holds only for freshly inserted rows.
        let inserted: bool = sqlx::query_scalar(
            r#"INSERT INTO users (id, login, first_name, last_name)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO UPDATE
                SET login = EXCLUDED.login,
                    first_name = EXCLUDED.first_name,
                    last_name = EXCLUDED.last_name
                RETURNING (xmax = 0)"#,
        )
        .bind(user.id)
        .bind(&user.login)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn update(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"UPDATE users SET login = $1, first_name = $2, last_name = $3
                WHERE id = $4"#,
        )
        .bind(&user.login)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_page(&self, page_number: i64, page_size: i64) -> Result<UserPage> {
        let total_count: i64 = sqlx::query(r#"SELECT COUNT(*) AS count FROM users"#)
            .fetch_one(&self.pool)
            .await?
            .try_get("count")?;

        let items = sqlx::query_as::<_, User>(
            r#"SELECT id, login, first_name, last_name FROM users
                ORDER BY login, id
                LIMIT $1 OFFSET $2"#,
        )
        .bind(page_size)
        // `page_number` is unbounded, so the offset must not overflow.
        .bind((page_number - 1).saturating_mul(page_size))
        .fetch_all(&self.pool)
        .await?;

        Ok(UserPage {
            items,
            total_count,
            total_pages: total_pages(total_count, page_size),
        })
    }
}

pub(crate) fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 0;
    }
    (total_count + page_size - 1) / page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(41, 20), 3);
    }
}
