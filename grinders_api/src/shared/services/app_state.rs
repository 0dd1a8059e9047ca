use tokio::time::Duration;

use crate::shared::config::AppConfig;
use crate::shared::database::Database;
use crate::domains::auth::services::state::AuthState;
use crate::domains::auth::services::session_cleanup::SessionCleanupScheduler;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 설정은 생성 시점에 각 서비스로 전달되며 이후 변경되지 않습니다.
#[derive(Clone)]
pub struct AppState {
    pub auth_state: AuthState,
    /// 만료 세션 정리 스케줄러
    /// Expired session sweep
    pub session_cleanup: SessionCleanupScheduler,
}

impl AppState {
    /// Create AppState with database and configuration
    /// 모든 도메인 State를 초기화하고 조합
    pub fn new(db: &Database, config: &AppConfig) -> Self {
        let auth_state = AuthState::new(db, config);

        let session_cleanup = SessionCleanupScheduler::new(
            auth_state.session_service.clone(),
            Duration::from_secs(config.session_sweep_interval_secs),
        );

        Self {
            auth_state,
            session_cleanup,
        }
    }
}
