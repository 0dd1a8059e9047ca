use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Refresh Token (메모리 전용, 원본 값 포함)
/// Refresh token as handed to the client. Only `id` leaves the server, and it
/// is never written to the store in this form.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub user_id: u64,
}

/// Session 모델 (DB 저장용, 해시된 토큰 ID로 식별)
/// Session row, keyed by the SHA-256 hash of the refresh token id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub hashed_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub user_id: u64,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// 세션 검증 결과
/// Outcome of looking up a presented refresh token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Active(Session),
    /// 아직 정리되지 않은 만료 세션
    /// Expired but not yet swept
    Expired(Session),
    NotFound,
}

impl SessionStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active(_))
    }
}

/// Access Token + Refresh Token 쌍
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
