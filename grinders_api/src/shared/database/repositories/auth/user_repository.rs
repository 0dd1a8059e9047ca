use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use anyhow::Context;

use crate::domains::auth::models::{NewUser, User};
use crate::shared::database::store::{StoreError, StoreResult, UserStore};

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_row(row: &SqliteRow) -> sqlx::Result<User> {
        Ok(User {
            id: row.try_get::<i64, _>("id")? as u64,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn add_user(&self, user: &NewUser) -> StoreResult<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?, ?, ?)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await;

        match row {
            Ok(row) => Ok(Self::map_row(&row).context("Failed to decode created user")?),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::Conflict),
            Err(e) => Err(anyhow::Error::new(e).context("Failed to create user").into()),
        }
    }

    // ID로 사용자 조회
    // Get user by ID
    async fn get_user(&self, user_id: u64) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by id")?;

        let user = row
            .as_ref()
            .map(Self::map_row)
            .transpose()
            .context("Failed to decode user row")?;

        Ok(user)
    }

    // 사용자명으로 사용자 조회 (로그인용)
    // Get user by username (for login)
    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by username")?;

        let user = row
            .as_ref()
            .map(Self::map_row)
            .transpose()
            .context("Failed to decode user row")?;

        Ok(user)
    }
}
