// 저장소 계약 (Store contracts)
//
// 인증 코어는 이 trait들만 알고, 실제 구현(SQLite)은 repositories 모듈에 있습니다.
// The auth core only depends on these traits; SQLite implementations live in `repositories`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domains::auth::models::{NewUser, Session, User};

/// 저장소 에러
/// Store error. Backend details are opaque to the auth core.
#[derive(Error, Debug)]
pub enum StoreError {
    /// 유일성 제약 위반 (예: 중복 사용자명)
    /// Unique constraint violated (e.g. duplicate username)
    #[error("Unique constraint violated")]
    Conflict,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Session 저장소
/// Session store: rows keyed by the hashed refresh token id
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 세션 저장
    async fn add_session(&self, session: &Session) -> StoreResult<()>;

    /// (hashed_id, user_id)로 세션 조회. 없으면 `None`.
    /// Look up a session; a miss is `Ok(None)`, not an error.
    async fn get_session(&self, hashed_id: &str, user_id: u64) -> StoreResult<Option<Session>>;

    /// 세션 삭제. 없는 세션을 삭제해도 에러가 아님.
    /// Delete a session; deleting a missing row is not an error.
    async fn delete_session(&self, hashed_id: &str) -> StoreResult<()>;

    /// 기존 세션 삭제 + 새 세션 저장을 하나의 트랜잭션으로 수행 (Rotation)
    /// Delete `old_hashed_id` (owned by `user_id`) and insert `new_session` atomically.
    ///
    /// Returns `Ok(false)` and changes nothing if the old row no longer exists.
    /// On `Err` nothing changes either: the old row survives and the new one is absent.
    async fn replace_session(
        &self,
        old_hashed_id: &str,
        user_id: u64,
        new_session: &Session,
    ) -> StoreResult<bool>;

    /// 사용자의 모든 세션 삭제 (모든 기기에서 로그아웃)
    async fn delete_sessions_for_user(&self, user_id: u64) -> StoreResult<u64>;

    /// 만료된 세션 삭제 (정리 작업)
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> StoreResult<u64>;
}

/// User 저장소
/// User store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 사용자 생성. 중복 사용자명이면 `StoreError::Conflict`.
    async fn add_user(&self, user: &NewUser) -> StoreResult<User>;

    async fn get_user(&self, user_id: u64) -> StoreResult<Option<User>>;

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
}
