use serde::{Deserialize, Serialize};

/// Access Token audience (고정 서비스 태그)
/// Fixed audience tag carried by every access token
pub const ACCESS_TOKEN_AUDIENCE: &str = "GrindersTUI";

/// JWT Claims (토큰에 포함될 데이터)
/// JWT Claims (data to be included in token)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 ID (문자열)
    /// Subject: user id as a decimal string
    pub sub: String,

    /// Audience
    pub aud: Vec<String>,

    /// 만료 시간 (Unix timestamp)
    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// 발급 시간 (Unix timestamp)
    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// 토큰 고유 ID
    /// Unique token id
    pub jti: String,
}

impl Claims {
    /// 새 Claims 생성
    /// Create new Claims issued at `now_ts` and valid for `lifetime_secs`
    pub fn new(user_id: u64, now_ts: i64, lifetime_secs: i64) -> Self {
        Self {
            sub: user_id.to_string(),
            aud: vec![ACCESS_TOKEN_AUDIENCE.to_string()],
            exp: now_ts + lifetime_secs,
            iat: now_ts,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// sub 필드를 숫자 사용자 ID로 변환
    /// Parse the subject as a numeric user id
    pub fn user_id(&self) -> Option<u64> {
        self.sub.parse::<u64>().ok().filter(|id| *id > 0)
    }
}
