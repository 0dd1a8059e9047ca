use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domains::auth::services::JwtService;
use crate::shared::errors::AuthError;
use crate::shared::services::AppState;

/// "Bearer " + 최소 토큰 길이
/// Shortest Authorization header value worth parsing
pub const MIN_AUTH_HEADER_LENGTH: usize = 30;

const BEARER_PREFIX: &str = "Bearer ";

/// 인증된 사용자 정보 (JWT 토큰에서 추출)
/// Authenticated user information (extracted from JWT token)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: u64,
    /// Access Token의 jti
    pub token_id: String,
}

/// Authorization 헤더에서 Bearer 토큰 추출
/// Pull the bearer token out of the `Authorization` header.
///
/// The length is checked before the prefix is stripped.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MissingToken)?;

    if value.len() < MIN_AUTH_HEADER_LENGTH {
        return Err(AuthError::InvalidAuthHeader);
    }

    value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::InvalidAuthHeader)
}

/// 요청 헤더 인증
/// Authenticate a request from its headers
pub fn authenticate(jwt_service: &JwtService, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
    let token = extract_bearer_token(headers)?;
    let claims = jwt_service.validate_access_token(token)?;
    let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;

    Ok(AuthenticatedUser {
        user_id,
        token_id: claims.jti,
    })
}

/// 401 응답 생성
/// 만료와 형식 오류를 구분해서 클라이언트가 만료 시에만 갱신하도록 함
pub fn unauthorized_response(err: &AuthError) -> Response {
    let message = match err {
        AuthError::TokenExpired => AuthError::TokenExpired.to_string(),
        AuthError::MissingToken | AuthError::InvalidAuthHeader => AuthError::MissingToken.to_string(),
        _ => AuthError::InvalidToken.to_string(),
    };

    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "Unauthorized request",
            "message": message,
        })),
    )
        .into_response()
}

/// 인증 미들웨어
/// 역할: 보호된 라우트 앞에서 토큰 검증 후 AuthenticatedUser를 extensions에 저장
///
/// 사용법:
/// ```ignore
/// Router::new()
///     .route("/me", get(get_me))
///     .route_layer(middleware::from_fn_with_state(state, require_auth))
/// ```
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match authenticate(&state.auth_state.jwt_service, request.headers()) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, path = %request.uri().path(), "request rejected");
            unauthorized_response(&e)
        }
    }
}

/// AuthenticatedUser를 Axum Extractor로 구현
///
/// require_auth가 먼저 실행되었으면 extensions의 값을 사용하고,
/// 아니면 같은 검증을 직접 수행합니다.
#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        authenticate(&state.auth_state.jwt_service, &parts.headers).map_err(|e| unauthorized_response(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::TokenSettings;
    use axum::body::to_bytes;
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};

    fn jwt() -> JwtService {
        JwtService::new(&TokenSettings {
            signing_key: "middleware-test-secret".to_string(),
            access_duration: Duration::minutes(5),
            session_duration: Duration::hours(1),
        })
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            extract_bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_short_header_rejected_before_slicing() {
        for value in ["", "B", "Bearer", "Bearer ", "Bearer abc"] {
            assert!(matches!(
                extract_bearer_token(&headers_with(value)),
                Err(AuthError::InvalidAuthHeader)
            ));
        }
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let long = "x".repeat(40);
        for value in [format!("Basic {long}"), format!("bearer {long}"), format!("Bearer{long}")] {
            assert!(matches!(
                extract_bearer_token(&headers_with(&value)),
                Err(AuthError::InvalidAuthHeader)
            ));
        }
    }

    #[test]
    fn test_bearer_token_extracted() {
        let token = "a".repeat(40);
        let headers = headers_with(&format!("Bearer {token}"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), token);
    }

    #[test]
    fn test_authenticate_forwards_identity() {
        let jwt = jwt();
        let token = jwt.issue_access_token(42).unwrap();
        let user = authenticate(&jwt, &headers_with(&format!("Bearer {token}"))).unwrap();

        assert_eq!(user.user_id, 42);
        assert_eq!(user.token_id, jwt.validate_access_token(&token).unwrap().jti);
    }

    #[test]
    fn test_authenticate_distinguishes_expired() {
        let jwt = jwt();
        let token = jwt
            .issue_access_token_at(42, Utc::now() - Duration::minutes(10))
            .unwrap();

        assert!(matches!(
            authenticate(&jwt, &headers_with(&format!("Bearer {token}"))),
            Err(AuthError::TokenExpired)
        ));
        assert!(matches!(
            authenticate(&jwt, &headers_with(&format!("Bearer {}", "x".repeat(40)))),
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_unauthorized_bodies() {
        let cases = [
            (AuthError::TokenExpired, "Token is expired"),
            (AuthError::InvalidToken, "Token is malformed"),
            (AuthError::MissingToken, "No Bearer token"),
            (AuthError::InvalidAuthHeader, "No Bearer token"),
        ];

        for (err, expected) in cases {
            let response = unauthorized_response(&err);
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let body = body_json(response).await;
            assert_eq!(body["error"], "Unauthorized request");
            assert_eq!(body["message"], expected);
        }
    }
}
