use std::sync::Arc;

use chrono::Utc;
use tokio::sync::OnceCell;

use crate::domains::auth::models::{LoginRequest, NewUser, RegisterRequest, TokenPair, User};
use crate::domains::auth::services::{JwtService, PasswordService, SessionService};
use crate::shared::database::{StoreError, UserStore};
use crate::shared::errors::AuthError;

/// 최소 비밀번호 길이
pub const MIN_PASSWORD_LENGTH: usize = 8;

// 존재하지 않는 사용자 로그인 시 검증에 쓰는 비밀번호
const UNKNOWN_USER_PASSWORD: &str = "unknown-user-placeholder-password";

// 인증 서비스
// 역할: 회원가입 / 로그인 / 토큰 갱신 / 로그아웃 흐름 조합
// AuthService: handles authentication business logic
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    password_service: PasswordService,
    jwt_service: JwtService,
    session_service: SessionService,
    /// 현재 Argon 설정으로 만든 더미 해시 (첫 사용 시 생성)
    unknown_user_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        password_service: PasswordService,
        jwt_service: JwtService,
        session_service: SessionService,
    ) -> Self {
        Self {
            users,
            password_service,
            jwt_service,
            session_service,
            unknown_user_hash: Arc::new(OnceCell::new()),
        }
    }

    // 회원가입 (비즈니스 로직)
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let username = request.username.trim().to_string();
        Self::validate_credentials(&username, &request.password)?;

        // 1. 사용자명 중복 확인
        let existing_user = self
            .users
            .get_user_by_username(&username)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to check username existence: {:#}", e)))?;

        if existing_user.is_some() {
            return Err(AuthError::UsernameAlreadyExists { username });
        }

        // 2. 비밀번호 해싱 (CPU 작업이므로 blocking 스레드에서)
        let password_hash = self.hash_password(request.password).await?;

        // 3. 사용자 생성
        let new_user = NewUser {
            username: username.clone(),
            password_hash,
            created_at: Utc::now(),
        };

        let user = match self.users.add_user(&new_user).await {
            Ok(user) => user,
            // 중복 확인 이후 다른 요청이 먼저 생성한 경우
            Err(StoreError::Conflict) => return Err(AuthError::UsernameAlreadyExists { username }),
            Err(e) => return Err(AuthError::DatabaseError(format!("Failed to create user: {:#}", e))),
        };

        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    // 로그인 (비즈니스 로직)
    // Returns: (User, access_token + refresh_token)
    pub async fn login(&self, request: LoginRequest) -> Result<(User, TokenPair), AuthError> {
        // 1. 사용자명으로 사용자 조회
        let user = self
            .users
            .get_user_by_username(request.username.trim())
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch user: {:#}", e)))?;

        let Some(user) = user else {
            // 사용자 존재 여부가 응답 시간으로 드러나지 않도록 같은 비용의 검증 수행
            let record = self.unknown_user_hash().await?;
            self.verify_password(request.password, record).await?;
            tracing::debug!("login rejected: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        // 2. 비밀번호 검증
        if !self.verify_password(request.password, user.password_hash.clone()).await? {
            tracing::debug!(user_id = user.id, "login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        // 3. Access Token + 새 세션 발급
        let access_token = self.jwt_service.issue_access_token(user.id)?;
        let refresh_token = self.session_service.create_session(user.id).await?;

        tracing::info!(user_id = user.id, "user logged in");
        Ok((
            user,
            TokenPair {
                access_token,
                refresh_token,
            },
        ))
    }

    /// Refresh Token 검증 및 새 토큰 쌍 발급 (Rotation)
    /// Verify refresh token and issue a new token pair
    pub async fn refresh(&self, user_id: u64, refresh_token: &str) -> Result<TokenPair, AuthError> {
        self.session_service.rotate_session(refresh_token, user_id).await
    }

    /// 로그아웃 - 세션 폐기
    /// Logout - revoke the session behind a refresh token
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.session_service.revoke_session(refresh_token).await
    }

    /// 사용자의 모든 세션 폐기 (모든 기기에서 로그아웃)
    /// Revoke all sessions for user (logout from all devices)
    pub async fn logout_all_devices(&self, user_id: u64) -> Result<u64, AuthError> {
        let revoked = self.session_service.revoke_all_sessions(user_id).await?;
        tracing::info!(user_id, revoked, "all sessions revoked");
        Ok(revoked)
    }

    pub async fn get_user_info(&self, user_id: u64) -> Result<User, AuthError> {
        self.users
            .get_user(user_id)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch user: {:#}", e)))?
            .ok_or(AuthError::UserNotFound { id: user_id })
    }

    fn validate_credentials(username: &str, password: &str) -> Result<(), AuthError> {
        if username.is_empty() {
            return Err(AuthError::InvalidInput("username must not be empty".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }

    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let password_service = self.password_service.clone();
        tokio::task::spawn_blocking(move || password_service.create_hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn unknown_user_hash(&self) -> Result<String, AuthError> {
        self.unknown_user_hash
            .get_or_try_init(|| self.hash_password(UNKNOWN_USER_PASSWORD.to_string()))
            .await
            .cloned()
    }

    async fn verify_password(&self, password: String, record: String) -> Result<bool, AuthError> {
        let password_service = self.password_service.clone();
        tokio::task::spawn_blocking(move || password_service.verify_hash(&password, &record))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification task failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::services::password_service::HashRecord;
    use crate::shared::config::{ArgonSettings, TokenSettings};
    use crate::shared::database::{Database, SessionRepository, UserRepository};

    async fn setup_service() -> AuthService {
        let db = Database::in_memory().await.unwrap();
        db.initialize().await.unwrap();

        let argon = ArgonSettings {
            time_cost: 1,
            memory_kib: 64,
            parallelism: 1,
            hash_length: 32,
            salt_length: 16,
        };
        let token = TokenSettings {
            signing_key: "auth-service-test-signing-key".to_string(),
            access_duration: chrono::Duration::minutes(5),
            session_duration: chrono::Duration::hours(1),
        };
        let jwt_service = JwtService::new(&token);
        let session_service = SessionService::new(
            Arc::new(SessionRepository::new(db.pool().clone())),
            jwt_service.clone(),
            token.session_duration,
        );

        AuthService::new(
            Arc::new(UserRepository::new(db.pool().clone())),
            PasswordService::new(argon),
            jwt_service,
            session_service,
        )
    }

    #[tokio::test]
    async fn test_unknown_user_login_runs_argon() {
        let service = setup_service().await;
        assert!(service.unknown_user_hash.get().is_none());

        let result = service
            .login(LoginRequest {
                username: "ghost".to_string(),
                password: "S3curePass!".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        // 더미 해시는 현재 설정의 유효한 Argon2id 레코드
        let record = service.unknown_user_hash.get().cloned().unwrap();
        let parsed = HashRecord::parse(&record).unwrap();
        assert_eq!(parsed.memory_kib, 64);
        assert!(!service.password_service.verify_hash("S3curePass!", &record));

        // 두 번째 실패는 같은 레코드 재사용
        let _ = service
            .login(LoginRequest {
                username: "ghost".to_string(),
                password: "other".to_string(),
            })
            .await;
        assert_eq!(service.unknown_user_hash.get(), Some(&record));
    }

    #[test]
    fn test_credentials_validation() {
        assert!(AuthService::validate_credentials("alice", "longenough").is_ok());
        assert!(matches!(
            AuthService::validate_credentials("", "longenough"),
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            AuthService::validate_credentials("alice", "short"),
            Err(AuthError::InvalidInput(_))
        ));
        // 문자 수 기준 (바이트 수 아님)
        assert!(matches!(
            AuthService::validate_credentials("alice", "한글비밀번호"),
            Err(AuthError::InvalidInput(_))
        ));
    }
}
