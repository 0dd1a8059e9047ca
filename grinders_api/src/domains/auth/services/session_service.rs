use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::domains::auth::models::{RefreshToken, Session, SessionStatus, TokenPair};
use crate::domains::auth::services::JwtService;
use crate::shared::database::{SessionStore, StoreError};
use crate::shared::errors::AuthError;

/// 세션 서비스
/// Session lifecycle: create, validate, rotate and revoke refresh-token sessions
///
/// 원본 Refresh Token은 클라이언트에게만 반환되고, 저장소에는 SHA-256 해시만 저장됩니다.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    jwt_service: JwtService,
    session_duration: Duration,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>, jwt_service: JwtService, session_duration: Duration) -> Self {
        Self {
            store,
            jwt_service,
            session_duration,
        }
    }

    /// 새 Refresh Token 생성 (메모리 전용)
    fn new_refresh_token(&self, user_id: u64, now: DateTime<Utc>) -> RefreshToken {
        RefreshToken {
            id: self.jwt_service.generate_refresh_token(),
            expires_at: now + self.session_duration,
            created_at: now,
            user_id,
        }
    }

    fn to_session(&self, token: &RefreshToken) -> Session {
        Session {
            hashed_id: self.jwt_service.hash_refresh_token(&token.id),
            expires_at: token.expires_at,
            created_at: token.created_at,
            user_id: token.user_id,
        }
    }

    /// 세션 생성
    /// Create a session and return the raw refresh token
    pub async fn create_session(&self, user_id: u64) -> Result<String, AuthError> {
        if user_id == 0 {
            return Err(AuthError::InvalidUserId);
        }

        let token = self.new_refresh_token(user_id, Utc::now());
        let session = self.to_session(&token);

        self.store
            .add_session(&session)
            .await
            .map_err(|e| store_error("Failed to create session", e))?;

        tracing::debug!(user_id, "session created");
        Ok(token.id)
    }

    /// 세션 검증
    /// Look up a presented refresh token
    pub async fn validate_session(&self, raw_token: &str, user_id: u64) -> Result<SessionStatus, AuthError> {
        self.validate_session_at(raw_token, user_id, Utc::now()).await
    }

    /// 지정한 시각 기준으로 세션 검증
    /// Look up a presented refresh token against `now`.
    ///
    /// A store miss is `NotFound`; an expired row that has not been swept yet
    /// is `Expired`. Only store failures are errors.
    pub async fn validate_session_at(
        &self,
        raw_token: &str,
        user_id: u64,
        now: DateTime<Utc>,
    ) -> Result<SessionStatus, AuthError> {
        if user_id == 0 || raw_token.is_empty() {
            return Ok(SessionStatus::NotFound);
        }

        let hashed_id = self.jwt_service.hash_refresh_token(raw_token);
        let session = self
            .store
            .get_session(&hashed_id, user_id)
            .await
            .map_err(|e| store_error("Failed to find session", e))?;

        Ok(match session {
            None => SessionStatus::NotFound,
            Some(session) if session.is_expired_at(now) => SessionStatus::Expired(session),
            Some(session) => SessionStatus::Active(session),
        })
    }

    /// 세션 교체 (Rotation) + 새 Access Token 발급
    /// Rotate a session: the presented token is consumed and a new pair is issued.
    ///
    /// Old-row deletion and new-row insertion happen in one store transaction,
    /// so a failure leaves the old session intact. Presenting an already
    /// rotated token yields `SessionNotFound`.
    pub async fn rotate_session(&self, old_raw_token: &str, user_id: u64) -> Result<TokenPair, AuthError> {
        let now = Utc::now();

        let old_session = match self.validate_session_at(old_raw_token, user_id, now).await? {
            SessionStatus::Active(session) => session,
            SessionStatus::Expired(_) => return Err(AuthError::SessionExpired),
            SessionStatus::NotFound => return Err(AuthError::SessionNotFound),
        };

        // 서명 실패 시 기존 세션은 건드리지 않음
        let access_token = self.jwt_service.issue_access_token_at(user_id, now)?;

        let new_token = self.new_refresh_token(user_id, now);
        let new_session = self.to_session(&new_token);

        let replaced = self
            .store
            .replace_session(&old_session.hashed_id, user_id, &new_session)
            .await
            .map_err(|e| store_error("Failed to rotate session", e))?;

        if !replaced {
            // 동시에 다른 요청이 먼저 교체함 (재사용 시도)
            tracing::warn!(user_id, "refresh token was rotated concurrently");
            return Err(AuthError::SessionNotFound);
        }

        tracing::debug!(user_id, "session rotated");
        Ok(TokenPair {
            access_token,
            refresh_token: new_token.id,
        })
    }

    /// 세션 폐기 (로그아웃)
    /// Revoke a session; revoking an unknown token is not an error
    pub async fn revoke_session(&self, raw_token: &str) -> Result<(), AuthError> {
        let hashed_id = self.jwt_service.hash_refresh_token(raw_token);

        self.store
            .delete_session(&hashed_id)
            .await
            .map_err(|e| store_error("Failed to revoke session", e))
    }

    /// 사용자의 모든 세션 폐기 (모든 기기에서 로그아웃)
    /// Revoke every session of a user
    pub async fn revoke_all_sessions(&self, user_id: u64) -> Result<u64, AuthError> {
        if user_id == 0 {
            return Err(AuthError::InvalidUserId);
        }

        self.store
            .delete_sessions_for_user(user_id)
            .await
            .map_err(|e| store_error("Failed to revoke all sessions", e))
    }

    /// 만료된 세션 정리
    /// Delete sessions that expired before now
    pub async fn purge_expired_sessions(&self) -> Result<u64, AuthError> {
        self.store
            .delete_expired_sessions(Utc::now())
            .await
            .map_err(|e| store_error("Failed to purge expired sessions", e))
    }
}

fn store_error(action: &str, err: StoreError) -> AuthError {
    tracing::error!(error = %format!("{err:#}"), "{action}");
    AuthError::DatabaseError(format!("{}: {:#}", action, err))
}
