use thiserror::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// 인증 관련 에러
/// Authentication-related errors
///
/// 입력 검증 / 인증 실패 / 저장소 에러 / 치명적 에러로 나뉩니다.
/// Input validation, authentication failures, store failures and fatal conditions.
#[derive(Error, Debug)]
pub enum AuthError {
    /// 잘못된 입력 (빈 사용자명, 짧은 비밀번호 등)
    /// Invalid input (empty username, short password, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 잘못된 사용자 ID (0)
    /// Invalid user id
    #[error("Invalid user id")]
    InvalidUserId,

    /// 사용자명이 이미 존재함
    /// Username already exists
    #[error("Username already exists: {username}")]
    UsernameAlreadyExists { username: String },

    /// 잘못된 사용자명 또는 비밀번호
    /// Invalid username or password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// 사용자를 찾을 수 없음
    /// User not found
    #[error("User not found: id={id}")]
    UserNotFound { id: u64 },

    /// 잘못된 토큰 (서명 불일치, 형식 오류 등)
    /// Malformed or otherwise invalid token
    #[error("Token is malformed")]
    InvalidToken,

    /// 만료된 토큰
    /// Expired access token
    #[error("Token is expired")]
    TokenExpired,

    /// 토큰이 제공되지 않음
    /// Token not provided
    #[error("No Bearer token")]
    MissingToken,

    /// Authorization 헤더 형식 오류
    /// Authorization header is too short or has the wrong scheme
    #[error("Invalid authorization format. Expected: 'Bearer <token>'")]
    InvalidAuthHeader,

    /// 세션을 찾을 수 없음 (폐기됨, 교체됨, 다른 사용자)
    /// Session not found (revoked, rotated away, or owned by another user)
    #[error("Session not found")]
    SessionNotFound,

    /// 만료된 세션
    /// Session has expired
    #[error("Session has expired")]
    SessionExpired,

    /// 비밀번호 해싱 실패
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    PasswordHashingFailed(String),

    /// 시스템 난수 생성 실패 (치명적)
    /// System randomness unavailable (fatal)
    #[error("System randomness unavailable")]
    EntropyUnavailable,

    /// 데이터베이스 에러
    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 내부 서버 에러
    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP 상태 코드
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidInput(_) | AuthError::InvalidUserId => StatusCode::BAD_REQUEST,
            AuthError::UsernameAlreadyExists { .. } => StatusCode::CONFLICT,
            AuthError::UserNotFound { .. } => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::MissingToken
            | AuthError::InvalidAuthHeader
            | AuthError::SessionNotFound
            | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
            AuthError::PasswordHashingFailed(_)
            | AuthError::EntropyUnavailable
            | AuthError::DatabaseError(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 응답 본문에 노출할 메시지 (저장소/내부 에러의 상세는 숨김)
    /// Message exposed to clients; store and internal details stay in the logs
    pub fn public_message(&self) -> String {
        match self {
            AuthError::DatabaseError(_) => "Database error".to_string(),
            AuthError::PasswordHashingFailed(_)
            | AuthError::EntropyUnavailable
            | AuthError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

/// AuthError를 HTTP 응답으로 변환
impl From<AuthError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: AuthError) -> Self {
        let status = err.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %err, "auth request failed");
        }
        (status, Json(json!({ "error": err.public_message() })))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        <(StatusCode, Json<serde_json::Value>)>::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_details_are_hidden() {
        let err = AuthError::DatabaseError("UNIQUE constraint failed: sessions.id".to_string());
        let (status, Json(body)) = err.into();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Database error");
    }

    #[test]
    fn test_auth_failures_are_unauthorized() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::InvalidToken,
            AuthError::TokenExpired,
            AuthError::MissingToken,
            AuthError::InvalidAuthHeader,
            AuthError::SessionNotFound,
            AuthError::SessionExpired,
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED, "{err}");
        }
    }

    #[test]
    fn test_expired_and_malformed_messages_differ() {
        assert_ne!(
            AuthError::TokenExpired.public_message(),
            AuthError::InvalidToken.public_message()
        );
    }
}
