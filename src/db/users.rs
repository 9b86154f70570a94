use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{NewUser, User},
};

/// Storage capability behind the user service.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user with a fresh id. A second insert for the same
    /// `telegram_id` fails with [`crate::Error::Conflict`].
    async fn create(&self, input: &NewUser) -> Result<User>;

    async fn get_by_id(&self, id: &str) -> Result<Option<User>>;

    async fn get_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>>;

    async fn exists(&self, telegram_id: i64) -> Result<bool>;
}

const USER_COLUMNS: &str = "id, telegram_id, username, first_name, last_name, created_at, updated_at";

/// [`UserRepository`] over the `users` table.
#[derive(Clone, Debug)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, input: &NewUser) -> Result<User> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, telegram_id, username, first_name, last_name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        )
        .bind(&id)
        .bind(input.telegram_id)
        .bind(input.username.as_deref())
        .bind(input.first_name.as_deref())
        .bind(input.last_name.as_deref())
        .bind(now)
        .execute(&self.pool)
        .await?;

        let user: User = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))
            .bind(&id)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let user: Option<User> = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn get_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>> {
        let user: Option<User> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE telegram_id = ?1"))
                .bind(telegram_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    async fn exists(&self, telegram_id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE telegram_id = ?1")
            .bind(telegram_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }
}
