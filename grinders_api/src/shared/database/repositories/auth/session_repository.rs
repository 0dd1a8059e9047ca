use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::domains::auth::models::Session;
use crate::shared::database::store::{SessionStore, StoreResult};

/// Session Repository
/// Session 데이터베이스 작업 처리
#[derive(Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // 손상된 컬럼은 panic 대신 에러로 전달
    fn map_row(row: &SqliteRow) -> sqlx::Result<Session> {
        Ok(Session {
            hashed_id: row.try_get("id")?,
            expires_at: row.try_get("expires_at")?,
            created_at: row.try_get("created_at")?,
            user_id: row.try_get::<i64, _>("user_id")? as u64,
        })
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    /// 세션 저장
    /// Insert session
    async fn add_session(&self, session: &Session) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO sessions (id, expires_at, created_at, user_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&session.hashed_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .bind(session.user_id as i64) // u64 -> i64 변환 (SQLite INTEGER = i64)
        .execute(&self.pool)
        .await
        .context("Failed to insert session")?;

        if result.rows_affected() != 1 {
            tracing::warn!(rows = result.rows_affected(), "add_session affected unexpected row count");
        }
        Ok(())
    }

    /// 세션 조회 (hashed_id + user_id)
    /// Find session by hashed id and owner
    async fn get_session(&self, hashed_id: &str, user_id: u64) -> StoreResult<Option<Session>> {
        let row = sqlx::query(
            r#"
            SELECT id, expires_at, created_at, user_id
            FROM sessions
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(hashed_id)
        .bind(user_id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch session")?;

        let session = row
            .as_ref()
            .map(Self::map_row)
            .transpose()
            .context("Failed to decode session row")?;

        Ok(session)
    }

    /// 세션 삭제
    /// Delete session
    async fn delete_session(&self, hashed_id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(hashed_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete session")?;

        if result.rows_affected() == 0 {
            tracing::debug!("delete_session: no rows affected");
        }
        Ok(())
    }

    /// 세션 교체 (Rotation) - 삭제와 저장을 하나의 트랜잭션으로
    /// Replace session - delete and insert in one transaction
    async fn replace_session(
        &self,
        old_hashed_id: &str,
        user_id: u64,
        new_session: &Session,
    ) -> StoreResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin session rotation")?;

        let deleted = sqlx::query("DELETE FROM sessions WHERE id = ? AND user_id = ?")
            .bind(old_hashed_id)
            .bind(user_id as i64)
            .execute(&mut *tx)
            .await
            .context("Failed to delete rotated session")?
            .rows_affected();

        // 이미 교체되었거나 폐기된 세션 (동시 요청 / 재사용 시도)
        if deleted == 0 {
            tx.rollback()
                .await
                .context("Failed to roll back session rotation")?;
            return Ok(false);
        }

        // 여기서 실패하면 tx가 drop되면서 자동 rollback → 기존 세션 유지
        sqlx::query(
            r#"
            INSERT INTO sessions (id, expires_at, created_at, user_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&new_session.hashed_id)
        .bind(new_session.expires_at)
        .bind(new_session.created_at)
        .bind(new_session.user_id as i64)
        .execute(&mut *tx)
        .await
        .context("Failed to insert rotated session")?;

        tx.commit()
            .await
            .context("Failed to commit session rotation")?;

        Ok(true)
    }

    /// 사용자의 모든 세션 삭제 (로그아웃 시)
    /// Delete all sessions for a user
    async fn delete_sessions_for_user(&self, user_id: u64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = ?")
            .bind(user_id as i64)
            .execute(&self.pool)
            .await
            .context("Failed to delete sessions for user")?;

        Ok(result.rows_affected())
    }

    /// 만료된 세션 삭제 (정리 작업)
    /// Delete expired sessions (cleanup)
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .context("Failed to delete expired sessions")?;

        Ok(result.rows_affected())
    }
}
