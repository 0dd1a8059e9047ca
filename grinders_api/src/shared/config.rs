// 애플리케이션 설정
// Application configuration
//
// 서버 시작 시 한 번만 환경변수에서 읽어서 각 서비스 생성자에 전달합니다.
// Loaded once at startup and handed to the service constructors.

use chrono::Duration;
use thiserror::Error;

/// 설정 로딩 에러
/// Configuration loading errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable \"{0}\"")]
    Missing(&'static str),

    #[error("Variable \"{name}\" must be a positive integer, got \"{value}\"")]
    NotPositive { name: &'static str, value: String },

    #[error("Variable \"{name}\" is out of range: {reason}")]
    OutOfRange { name: &'static str, reason: String },

    #[error("\"DEBUG\" must be 0 (debug mode off) or 1 (debug mode on), got \"{0}\"")]
    InvalidDebugFlag(String),
}

/// Argon2id 비용 파라미터
/// Argon2id cost parameters used when creating new hashes.
///
/// 검증할 때는 해시 문자열에 포함된 파라미터를 사용하므로,
/// 이 값을 바꿔도 기존 해시는 계속 검증됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgonSettings {
    pub time_cost: u32,
    /// 메모리 비용 (KiB)
    pub memory_kib: u32,
    pub parallelism: u32,
    /// 파생 키 길이 (bytes)
    pub hash_length: usize,
    /// 솔트 길이 (bytes)
    pub salt_length: usize,
}

impl Default for ArgonSettings {
    // OWASP 권장 최소값 (m=19MiB, t=2, p=1)
    fn default() -> Self {
        Self {
            time_cost: 2,
            memory_kib: 19_456,
            parallelism: 1,
            hash_length: 32,
            salt_length: 16,
        }
    }
}

/// 토큰 설정
/// Token settings
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// HS256 서명 키
    /// HS256 signing key
    pub signing_key: String,
    /// Access Token 수명
    pub access_duration: Duration,
    /// Session (Refresh Token) 수명
    pub session_duration: Duration,
}

/// 전체 애플리케이션 설정
/// Whole application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub address: String,
    pub debug: bool,
    /// 만료 세션 정리 주기 (초)
    pub session_sweep_interval_secs: u64,
    pub argon: ArgonSettings,
    pub token: TokenSettings,
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite://grinders.db";
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:3002";
pub const DEFAULT_ACCESS_TOKEN_MINUTES: u64 = 15;
pub const DEFAULT_SESSION_HOURS: u64 = 168;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

// argon2 crate 제약: salt 8..=48 bytes (PHC b64 최대 64자)
const MIN_SALT_LENGTH: usize = 8;
const MAX_SALT_LENGTH: usize = 48;
const MIN_HASH_LENGTH: usize = 4;

impl AppConfig {
    /// 환경변수에서 설정 로드 (.env 포함)
    /// Load configuration from the process environment (and `.env` if present)
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 key/value 조회 함수로 설정 로드
    /// Load configuration through an arbitrary lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let signing_key = get("JWT_SIGNING_KEY").ok_or(ConfigError::Missing("JWT_SIGNING_KEY"))?;

        let debug = match get("DEBUG").as_deref() {
            None | Some("0") => false,
            Some("1") => true,
            Some(other) => return Err(ConfigError::InvalidDebugFlag(other.to_string())),
        };

        let argon = ArgonSettings {
            time_cost: required_u32(&get, "ARGON_TIME")?,
            memory_kib: required_u32(&get, "ARGON_MEMORY")?,
            parallelism: required_u32(&get, "ARGON_THREADS")?,
            hash_length: required_u32(&get, "ARGON_HASH_LENGTH")? as usize,
            salt_length: optional_u64(&get, "ARGON_SALT_LENGTH", 16)? as usize,
        };
        validate_argon(&argon)?;

        let access_minutes = optional_u64(&get, "ACCESS_TOKEN_DURATION", DEFAULT_ACCESS_TOKEN_MINUTES)?;
        let session_hours = optional_u64(&get, "SESSION_DURATION", DEFAULT_SESSION_HOURS)?;

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            address: get("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            debug,
            session_sweep_interval_secs: optional_u64(
                &get,
                "SESSION_SWEEP_INTERVAL",
                DEFAULT_SWEEP_INTERVAL_SECS,
            )?,
            argon,
            token: TokenSettings {
                signing_key,
                access_duration: Duration::minutes(access_minutes as i64),
                session_duration: Duration::hours(session_hours as i64),
            },
        })
    }
}

fn parse_positive(name: &'static str, value: String) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 && n <= i32::MAX as u64 => Ok(n),
        _ => Err(ConfigError::NotPositive { name, value }),
    }
}

fn required_u32<G>(get: &G, name: &'static str) -> Result<u32, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let value = get(name).ok_or(ConfigError::Missing(name))?;
    parse_positive(name, value).map(|n| n as u32)
}

fn optional_u64<G>(get: &G, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) => parse_positive(name, value),
        None => Ok(default),
    }
}

fn validate_argon(argon: &ArgonSettings) -> Result<(), ConfigError> {
    if !(MIN_SALT_LENGTH..=MAX_SALT_LENGTH).contains(&argon.salt_length) {
        return Err(ConfigError::OutOfRange {
            name: "ARGON_SALT_LENGTH",
            reason: format!("must be between {MIN_SALT_LENGTH} and {MAX_SALT_LENGTH} bytes"),
        });
    }
    if argon.hash_length < MIN_HASH_LENGTH {
        return Err(ConfigError::OutOfRange {
            name: "ARGON_HASH_LENGTH",
            reason: format!("must be at least {MIN_HASH_LENGTH} bytes"),
        });
    }
    // Argon2: m >= 8 * p
    if (argon.memory_kib as u64) < 8 * argon.parallelism as u64 {
        return Err(ConfigError::OutOfRange {
            name: "ARGON_MEMORY",
            reason: format!("must be at least 8 * ARGON_THREADS ({} KiB)", 8 * argon.parallelism),
        });
    }

    // 나머지 상한/하한은 argon2 크레이트 기준으로 확인
    argon2::Params::new(
        argon.memory_kib,
        argon.time_cost,
        argon.parallelism,
        Some(argon.hash_length),
    )
    .map_err(|e| ConfigError::OutOfRange {
        name: argon_param_name(&e),
        reason: e.to_string(),
    })?;

    Ok(())
}

fn argon_param_name(error: &argon2::Error) -> &'static str {
    match error {
        argon2::Error::ThreadsTooFew | argon2::Error::ThreadsTooMany => "ARGON_THREADS",
        argon2::Error::MemoryTooLittle | argon2::Error::MemoryTooMuch => "ARGON_MEMORY",
        argon2::Error::TimeTooSmall => "ARGON_TIME",
        argon2::Error::OutputTooShort | argon2::Error::OutputTooLong => "ARGON_HASH_LENGTH",
        _ => "ARGON_PARAMS",
    }
}
