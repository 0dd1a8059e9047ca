// src/domains/auth/services/password_service.rs
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::{OsRng, RngCore};
use thiserror::Error;

use crate::shared::config::ArgonSettings;
use crate::shared::errors::AuthError;

/// 지원하는 해시 알고리즘 태그
pub const HASH_ALGORITHM: &str = "argon2id";

/// 현재 Argon2 버전 (0x13 = 19)
pub const HASH_VERSION: u32 = Version::V0x13 as u32;

/// 해시 레코드 파싱 에러
/// Reasons a stored hash record cannot be used
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HashRecordError {
    #[error("malformed hash record")]
    Malformed,
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("unsupported version: {found:?} (expected {HASH_VERSION})")]
    VersionMismatch { found: Option<u32> },
    #[error("invalid cost parameters")]
    InvalidParams,
    #[error("missing salt or key")]
    MissingComponent,
}

/// 해시 레코드 메타데이터
/// Metadata embedded in a `$argon2id$v=19$m=..,t=..,p=..$salt$key` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRecord {
    pub algorithm: String,
    pub version: u32,
    pub memory_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
    /// base64 (no padding) salt
    pub salt: String,
    /// 파생 키 길이 (bytes)
    pub key_length: usize,
}

impl HashRecord {
    /// 해시 레코드 파싱 (절대 panic 하지 않음)
    /// Parse a stored record. Total: every input yields `Ok` or `Err`.
    pub fn parse(record: &str) -> Result<Self, HashRecordError> {
        let parsed = PasswordHash::new(record).map_err(|_| HashRecordError::Malformed)?;
        Self::from_phc(&parsed)
    }

    fn from_phc(parsed: &PasswordHash<'_>) -> Result<Self, HashRecordError> {
        if parsed.algorithm.as_str() != HASH_ALGORITHM {
            return Err(HashRecordError::UnsupportedAlgorithm(
                parsed.algorithm.as_str().to_string(),
            ));
        }

        // 버전이 다르면 다른 방식으로 재계산하지 않고 거부
        if parsed.version != Some(HASH_VERSION) {
            return Err(HashRecordError::VersionMismatch {
                found: parsed.version,
            });
        }

        let (salt, key) = match (&parsed.salt, &parsed.hash) {
            (Some(salt), Some(key)) => (salt, key),
            _ => return Err(HashRecordError::MissingComponent),
        };

        let params = Params::try_from(parsed).map_err(|_| HashRecordError::InvalidParams)?;

        Ok(Self {
            algorithm: HASH_ALGORITHM.to_string(),
            version: HASH_VERSION,
            memory_kib: params.m_cost(),
            time_cost: params.t_cost(),
            parallelism: params.p_cost(),
            salt: salt.as_str().to_string(),
            key_length: key.len(),
        })
    }
}

/// 비밀번호 해싱 서비스
/// Password hashing service (Argon2id)
#[derive(Clone)]
pub struct PasswordService {
    settings: ArgonSettings,
}

impl PasswordService {
    pub fn new(settings: ArgonSettings) -> Self {
        Self { settings }
    }

    /// 비밀번호 해싱
    /// Hash a password with a fresh random salt and the configured cost.
    ///
    /// Fails with `EntropyUnavailable` if the OS CSPRNG cannot produce a salt;
    /// there is no fallback to a weaker source.
    pub fn create_hash(&self, password: &str) -> Result<String, AuthError> {
        let mut salt_bytes = vec![0u8; self.settings.salt_length];
        OsRng.try_fill_bytes(&mut salt_bytes).map_err(|e| {
            tracing::error!(error = %e, "unable to generate salt");
            AuthError::EntropyUnavailable
        })?;

        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| AuthError::PasswordHashingFailed(format!("Invalid salt: {}", e)))?;

        let params = Params::new(
            self.settings.memory_kib,
            self.settings.time_cost,
            self.settings.parallelism,
            Some(self.settings.hash_length),
        )
        .map_err(|e| AuthError::PasswordHashingFailed(format!("Invalid Argon2 params: {}", e)))?;

        let password_hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::PasswordHashingFailed(format!("Failed to hash password: {}", e)))?
            .to_string();

        Ok(password_hash)
    }

    /// 비밀번호 검증
    /// Verify a password against a stored record.
    ///
    /// Uses the parameters embedded in the record, not the live settings. Any
    /// parse failure, version skew or key mismatch yields `false`.
    pub fn verify_hash(&self, password: &str, record: &str) -> bool {
        let parsed = match PasswordHash::new(record) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is malformed");
                return false;
            }
        };

        if let Err(e) = HashRecord::from_phc(&parsed) {
            tracing::warn!(error = %e, "stored password hash rejected");
            return false;
        }

        tracing::debug!(
            params = %parsed.params,
            "verifying password with embedded Argon2id params"
        );

        // Argon2 인스턴스의 파라미터는 무시되고 해시의 파라미터가 사용됨 (상수 시간 비교)
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 테스트 속도를 위한 낮은 비용
    fn fast_settings() -> ArgonSettings {
        ArgonSettings {
            time_cost: 1,
            memory_kib: 64,
            parallelism: 1,
            hash_length: 32,
            salt_length: 16,
        }
    }

    fn service() -> PasswordService {
        PasswordService::new(fast_settings())
    }

    #[test]
    fn test_hash_and_verify_password() {
        let service = service();
        let record = service.create_hash("S3curePass!").unwrap();

        assert!(record.starts_with("$argon2id$v=19$"));
        assert!(record.contains("$m=64,t=1,p=1$"));
        assert!(service.verify_hash("S3curePass!", &record));
        assert!(!service.verify_hash("wrong", &record));
    }

    #[test]
    fn test_salts_never_repeat() {
        let service = service();
        let first = HashRecord::parse(&service.create_hash("Password1").unwrap()).unwrap();
        let second = HashRecord::parse(&service.create_hash("Password1").unwrap()).unwrap();

        assert_ne!(first.salt, second.salt);
    }

    #[test]
    fn test_record_carries_parameters() {
        let settings = ArgonSettings {
            time_cost: 2,
            memory_kib: 128,
            parallelism: 2,
            hash_length: 24,
            salt_length: 24,
        };
        let record = PasswordService::new(settings).create_hash("pw").unwrap();
        let parsed = HashRecord::parse(&record).unwrap();

        assert_eq!(parsed.algorithm, "argon2id");
        assert_eq!(parsed.version, 19);
        assert_eq!(parsed.memory_kib, 128);
        assert_eq!(parsed.time_cost, 2);
        assert_eq!(parsed.parallelism, 2);
        assert_eq!(parsed.key_length, 24);
        // 24 bytes -> 32 base64 chars (no padding)
        assert_eq!(parsed.salt.len(), 32);
    }

    #[test]
    fn test_old_records_survive_setting_changes() {
        let old = PasswordService::new(ArgonSettings {
            time_cost: 2,
            memory_kib: 128,
            parallelism: 2,
            hash_length: 16,
            salt_length: 8,
        });
        let record = old.create_hash("legacy-password").unwrap();

        // 현재 설정이 바뀌어도 기존 해시는 검증 가능
        let current = service();
        assert!(current.verify_hash("legacy-password", &record));
        assert!(!current.verify_hash("legacy-passwore", &record));
    }

    #[test]
    fn test_version_skew_fails_closed() {
        let service = service();
        let record = service.create_hash("S3curePass!").unwrap();
        let skewed = record.replacen("$v=19$", "$v=16$", 1);

        assert!(matches!(
            HashRecord::parse(&skewed),
            Err(HashRecordError::VersionMismatch { found: Some(16) })
        ));
        assert!(!service.verify_hash("S3curePass!", &skewed));
    }

    #[test]
    fn test_other_algorithms_rejected() {
        let service = service();
        let record = service.create_hash("S3curePass!").unwrap();
        let argon2i = record.replacen("$argon2id$", "$argon2i$", 1);

        assert!(matches!(
            HashRecord::parse(&argon2i),
            Err(HashRecordError::UnsupportedAlgorithm(_))
        ));
        assert!(!service.verify_hash("S3curePass!", &argon2i));
    }

    #[test]
    fn test_garbage_records_do_not_panic() {
        let service = service();
        let record = service.create_hash("S3curePass!").unwrap();
        let truncated = &record[..record.rfind('$').unwrap()];

        for bad in [
            "",
            "$",
            "not-a-valid-hash",
            "$argon2id$",
            "$argon2id$v=19",
            "$argon2id$v=abc$m=64,t=1,p=1$c2FsdHNhbHQ$aGFzaA",
            "$argon2id$v=19$m=x,t=1,p=1$c2FsdHNhbHQ$aGFzaA",
            "$argon2id$v=19$m=1,t=1,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNo",
            "$argon2id$v=19$m=64,t=1,p=1$!!!$aGFzaA",
            truncated,
        ] {
            assert!(!service.verify_hash("S3curePass!", bad), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_unicode_password() {
        let service = service();
        let record = service.create_hash("한글패스워드123").unwrap();
        assert!(service.verify_hash("한글패스워드123", &record));
    }
}
