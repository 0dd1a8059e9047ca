use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::auth::models::user::UserResponse;

// 회원가입 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = RegisterRequest)]
pub struct RegisterRequest {
    /// Username (unique)
    /// 사용자명 (중복 불가)
    #[schema(example = "alice")]
    pub username: String,

    /// Password (will be hashed, at least 8 characters)
    /// 비밀번호 (해싱됨, 최소 8자)
    #[schema(example = "S3curePass!")]
    pub password: String,
}

// 회원가입 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = RegisterResponse)]
pub struct RegisterResponse {
    /// User information (without password)
    /// 사용자 정보 (비밀번호 제외)
    pub user: UserResponse,

    /// Success message
    /// 성공 메시지
    pub message: String,
}

// 로그인 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = LoginRequest)]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: String,

    #[schema(example = "S3curePass!")]
    pub password: String,
}

// 로그인 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = LoginResponse)]
pub struct LoginResponse {
    /// User information (without password)
    /// 사용자 정보 (비밀번호 제외)
    pub user: UserResponse,

    /// JWT Access Token (짧은 수명)
    /// JWT Access Token (short lifetime)
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,

    /// Refresh Token (긴 수명, DB에는 해시만 저장)
    /// Refresh Token (long lifetime, only its hash is stored)
    #[schema(example = "abc123def456...")]
    pub refresh_token: String,

    pub message: String,
}

// 토큰 갱신 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = RefreshTokenRequest)]
pub struct RefreshTokenRequest {
    /// Session owner
    /// 세션 소유자 ID
    #[schema(example = 1)]
    pub user_id: u64,

    /// Refresh Token
    /// 리프레시 토큰
    #[schema(example = "abc123def456...")]
    pub refresh_token: String,
}

// 토큰 갱신 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = RefreshTokenResponse)]
pub struct RefreshTokenResponse {
    /// 새 Access Token
    /// New Access Token
    pub access_token: String,

    /// 새 Refresh Token (이전 토큰은 더 이상 사용 불가)
    /// New Refresh Token (the presented one is no longer valid)
    pub refresh_token: String,

    pub message: String,
}

// 로그아웃 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = LogoutRequest)]
pub struct LogoutRequest {
    /// Refresh Token
    /// 리프레시 토큰
    #[schema(example = "abc123def456...")]
    pub refresh_token: String,
}

// 전체 로그아웃 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = LogoutAllResponse)]
pub struct LogoutAllResponse {
    /// Number of sessions revoked
    /// 폐기된 세션 수
    pub revoked: u64,

    pub message: String,
}
