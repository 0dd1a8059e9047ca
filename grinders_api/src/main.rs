use anyhow::{Context, Result};
use axum::http::{header, Method};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use grinders_api::routes::create_router;
use grinders_api::shared::config::AppConfig;
use grinders_api::shared::database::Database;
use grinders_api::shared::services::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // 설정 로드 (서명 키 / Argon 파라미터가 없으면 시작하지 않음)
    let config = AppConfig::from_env().context("Invalid configuration")?;

    // 로깅 초기화: RUST_LOG 우선, 없으면 DEBUG 플래그에 따라 info/debug
    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // DB 연결
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    db.initialize()
        .await
        .context("Failed to initialize database")?;

    // AppState 생성 (모든 Service 초기화)
    let app_state = AppState::new(&db, &config);

    // 만료 세션 정리 시작
    app_state.session_cleanup.start();

    // CORS 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Router 생성
    let app = create_router(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.address)
        .await
        .with_context(|| format!("Failed to bind {}", config.address))?;

    tracing::info!(address = %config.address, "server running");
    tracing::info!("Swagger UI available at http://{}/api", config.address);
    tracing::info!(database = %config.database_url, "database: SQLite");

    // 서버 실행 (Ctrl+C 시 정상 종료)
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
