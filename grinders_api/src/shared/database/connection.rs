use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use anyhow::{Context, Result};

// 데이터베이스 연결 풀
// Database connection pool for the embedded SQLite database
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    // 데이터베이스 연결 생성
    // Create database connection
    // db_url: SQLite 연결 문자열 (예: "sqlite://grinders.db")
    pub async fn new(db_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(db_url)
            .with_context(|| format!("Invalid database url: {db_url}"))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        Ok(Self { pool })
    }

    /// 테스트용 인메모리 데이터베이스
    /// In-memory database for tests. A single connection that never expires,
    /// since every new in-memory connection would see an empty database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory database url")?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        Ok(Self { pool })
    }

    // 연결 풀 반환
    // Get connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // 테이블 생성 (초기화) - 마이그레이션 실행
    // Create tables (initialization) - Run migrations
    // migrations/ 폴더의 모든 .sql 파일을 순서대로 실행
    pub async fn initialize(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(self.pool())
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database migrations completed successfully");
        Ok(())
    }
}
