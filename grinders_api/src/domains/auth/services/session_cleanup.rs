use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::domains::auth::services::SessionService;
use crate::shared::errors::AuthError;

/// 만료 세션 정리 스케줄러
/// Expired session sweep
///
/// 처리 흐름:
/// 1. 스케줄러 시작 시 백그라운드 태스크 실행
/// 2. 설정된 주기마다 만료된 세션 삭제
/// 3. 활성화 상태에 따라 실행 여부 결정
#[derive(Clone)]
pub struct SessionCleanupScheduler {
    session_service: SessionService,

    /// 정리 주기
    period: Duration,

    /// 스케줄러 활성화 상태
    enabled: Arc<AtomicBool>,
}

impl SessionCleanupScheduler {
    pub fn new(session_service: SessionService, period: Duration) -> Self {
        Self {
            session_service,
            period,
            enabled: Arc::new(AtomicBool::new(true)), // 기본값: 활성화
        }
    }

    /// 스케줄러 시작
    /// Start the sweep loop on the runtime
    pub fn start(&self) -> JoinHandle<()> {
        let scheduler = self.clone();

        tokio::spawn(async move {
            let mut ticker = interval(scheduler.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::info!(period_secs = scheduler.period.as_secs(), "session sweep started");

            loop {
                ticker.tick().await;

                if !scheduler.is_enabled() {
                    continue;
                }

                // 실패해도 다음 주기에 다시 시도
                let _ = scheduler.run_once().await;
            }
        })
    }

    /// 한 번 정리 실행
    /// Run one sweep and return the number of deleted sessions
    pub async fn run_once(&self) -> Result<u64, AuthError> {
        match self.session_service.purge_expired_sessions().await {
            Ok(purged) => {
                if purged > 0 {
                    tracing::info!(purged, "expired sessions purged");
                }
                Ok(purged)
            }
            Err(e) => {
                tracing::warn!(error = %e, "session sweep failed");
                Err(e)
            }
        }
    }

    /// 스케줄러 활성화
    /// Enable scheduler
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    /// 스케줄러 비활성화
    /// Disable scheduler
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}
