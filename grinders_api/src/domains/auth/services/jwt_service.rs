// src/domains/auth/services/jwt_service.rs
use crate::shared::config::TokenSettings;
use crate::shared::errors::AuthError;
use crate::domains::auth::models::jwt::{Claims, ACCESS_TOKEN_AUDIENCE};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Sha256, Digest};
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Refresh Token 길이 (영숫자)
pub const REFRESH_TOKEN_LENGTH: usize = 64;

/// 허용하는 유일한 서명 알고리즘
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT 서비스
/// JWT Service for token generation and verification
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_duration: Duration,
}

impl JwtService {
    /// JWT Service 생성 (서명 키는 시작 시 한 번만 로드)
    /// Create JWT Service; the signing key is loaded once
    pub fn new(settings: &TokenSettings) -> Self {
        let secret = settings.signing_key.as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_duration: settings.access_duration,
        }
    }

    /// Access Token 발급 (짧은 수명)
    /// Generate Access Token (short lifetime)
    pub fn issue_access_token(&self, user_id: u64) -> Result<String, AuthError> {
        self.issue_access_token_at(user_id, Utc::now())
    }

    /// 지정한 시각 기준으로 Access Token 발급
    /// Generate Access Token as if issued at `now`
    pub fn issue_access_token_at(&self, user_id: u64, now: DateTime<Utc>) -> Result<String, AuthError> {
        if user_id == 0 {
            return Err(AuthError::InvalidUserId);
        }

        let claims = Claims::new(user_id, now.timestamp(), self.access_duration.num_seconds());

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to generate access token: {}", e)))
    }

    /// Access Token 검증
    /// Verify Access Token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_access_token_at(token, Utc::now())
    }

    /// 지정한 시각 기준으로 Access Token 검증
    /// Verify Access Token against `now`.
    ///
    /// Signature, algorithm and audience failures are reported as `InvalidToken`;
    /// only a well-formed token past its `exp` is `TokenExpired`.
    pub fn validate_access_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.set_audience(&[ACCESS_TOKEN_AUDIENCE]);
        validation.set_required_spec_claims(&["exp", "iat", "sub", "aud"]);
        // 만료는 아래에서 `now` 기준으로 직접 검사
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "access token rejected");
                AuthError::InvalidToken
            })?
            .claims;

        if now.timestamp() > claims.exp {
            return Err(AuthError::TokenExpired);
        }

        if claims.user_id().is_none() {
            tracing::debug!(sub = %claims.sub, "access token subject is not a user id");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }

    /// Refresh Token 생성 (랜덤 문자열, 해시만 DB에 저장할 것)
    /// Generate Refresh Token (random string; only its hash is stored)
    pub fn generate_refresh_token(&self) -> String {
        // ThreadRng: OS 엔트로피로 시드된 CSPRNG
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(REFRESH_TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }

    /// Refresh Token 해싱 (DB 저장용)
    /// Hash Refresh Token (for database storage)
    pub fn hash_refresh_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
