// Auth domain routes
// 인증 도메인 라우터
use axum::{middleware, routing::{get, post}, Router};
use crate::domains::auth::handlers::auth_handler;
use crate::shared::middleware::require_auth;
use crate::shared::services::AppState;

/// Create authentication router
/// 인증 라우터 생성
///
/// `/logout-all`, `/me`는 require_auth 미들웨어 뒤에 있습니다.
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout-all", post(auth_handler::logout_all))
        .route("/me", get(auth_handler::get_me))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(auth_handler::register))
        .route("/login", post(auth_handler::login))
        .route("/refresh", post(auth_handler::refresh))
        .route("/logout", post(auth_handler::logout))
        .merge(protected)
}
