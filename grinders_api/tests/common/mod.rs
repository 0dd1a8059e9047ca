// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 모든 통합 테스트에서 공통으로 사용하는 셋업 함수 제공
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let (sessions, db) = setup_sessions().await;
//     // 테스트 코드...
// }
// ```
// =====================================================
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use chrono::{Duration, Utc};

use grinders_api::domains::auth::services::{JwtService, SessionService};
use grinders_api::routes::create_router;
use grinders_api::shared::config::AppConfig;
use grinders_api::shared::database::{Database, SessionRepository};
use grinders_api::shared::services::AppState;

// 테스트용 상수
pub const TEST_SIGNING_KEY: &str = "integration-test-signing-key-0123456789";

/// 테스트용 설정 (낮은 Argon 비용)
pub fn test_config() -> AppConfig {
    let env: HashMap<&str, &str> = HashMap::from([
        ("JWT_SIGNING_KEY", TEST_SIGNING_KEY),
        ("ARGON_TIME", "1"),
        ("ARGON_MEMORY", "64"),
        ("ARGON_THREADS", "1"),
        ("ARGON_HASH_LENGTH", "32"),
        ("ACCESS_TOKEN_DURATION", "5"),
        ("SESSION_DURATION", "1"),
    ]);

    AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()))
        .expect("test config must be valid")
}

/// 인메모리 DB 생성 + 마이그레이션
pub async fn setup_db() -> Database {
    let db = Database::in_memory()
        .await
        .expect("Failed to open in-memory database");

    db.initialize()
        .await
        .expect("Failed to initialize database");

    db
}

/// 세션 테스트용 셋업
pub async fn setup_sessions() -> (SessionService, Database) {
    let db = setup_db().await;
    let config = test_config();

    let sessions = SessionService::new(
        Arc::new(SessionRepository::new(db.pool().clone())),
        JwtService::new(&config.token),
        config.token.session_duration,
    );

    (sessions, db)
}

/// HTTP 테스트용 셋업 (라우터 + 상태)
pub async fn setup_app() -> (Router, AppState) {
    let db = setup_db().await;
    let state = AppState::new(&db, &test_config());
    (create_router(state.clone()), state)
}

/// 고정 ID로 사용자 생성 (sessions.user_id 외래 키 때문에 필요)
pub async fn seed_user(db: &Database, user_id: u64) {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, password_hash, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id as i64)
    .bind(format!("user_{}", user_id))
    .bind("dummy_hash")
    .bind(Utc::now())
    .execute(db.pool())
    .await
    .expect("Failed to seed user");
}

/// 사용자의 세션 행 수
pub async fn session_count(db: &Database, user_id: u64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE user_id = ?")
        .bind(user_id as i64)
        .fetch_one(db.pool())
        .await
        .expect("Failed to count sessions")
}

/// 이미 만료된 세션 행 직접 삽입
pub async fn insert_expired_session(db: &Database, hashed_id: &str, user_id: u64) {
    let created_at = Utc::now() - Duration::hours(3);
    sqlx::query(
        r#"
        INSERT INTO sessions (id, expires_at, created_at, user_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(hashed_id)
    .bind(created_at + Duration::hours(1))
    .bind(created_at)
    .bind(user_id as i64)
    .execute(db.pool())
    .await
    .expect("Failed to insert expired session");
}
