// Auth domain state
// 인증 도메인 상태
use std::sync::Arc;

use crate::shared::config::AppConfig;
use crate::shared::database::{Database, SessionRepository, UserRepository};
use crate::domains::auth::services::{AuthService, JwtService, PasswordService, SessionService};

/// Auth domain state
/// 인증 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: AuthService,
    pub jwt_service: JwtService,
    pub session_service: SessionService,
}

impl AuthState {
    /// Create AuthState with database and startup configuration
    /// AuthState 생성 (설정은 시작 시 한 번만 읽음)
    pub fn new(db: &Database, config: &AppConfig) -> Self {
        let jwt_service = JwtService::new(&config.token);
        let password_service = PasswordService::new(config.argon);

        let session_service = SessionService::new(
            Arc::new(SessionRepository::new(db.pool().clone())),
            jwt_service.clone(),
            config.token.session_duration,
        );

        let auth_service = AuthService::new(
            Arc::new(UserRepository::new(db.pool().clone())),
            password_service,
            jwt_service.clone(),
            session_service.clone(),
        );

        Self {
            auth_service,
            jwt_service,
            session_service,
        }
    }
}
