//! Gatekit Bridge
//!
//! 로그인/토큰 재발급 엔드포인트를 제공하고, 보호된 라우트 앞에서
//! 요청 주체 확인과 권한 검사를 수행합니다.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod middleware;
mod state;
mod users;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "gk_bridge=debug,gk_core=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!("Starting Bridge with config: {:?}", config);

    // 앱 상태 초기화 (키/정책 로드 실패 시 중단)
    let state = Arc::new(AppState::new(&config)?);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Bridge listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// 라우터 생성
fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Identity가 필요한 라우트
        .route("/auth/whoami", get(handlers::auth::whoami))
        .route("/users/{id}", get(handlers::users::user_detail))
        .route_layer(from_fn_with_state(state.clone(), middleware::authenticate))
        // 공개 라우트
        .route("/auth/token", post(handlers::auth::create_token))
        .route("/auth/refresh", post(handlers::auth::refresh_token))
        .route("/health", get(handlers::health::health_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(from_fn(middleware::request_id))
        // State
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, HeaderValue, Request, StatusCode};
    use axum::response::Response;
    use chrono::DateTime;
    use gk_core::auth::{KeyMaterial, TokenConfig};
    use gk_core::clock::ManualClock;
    use gk_core::permissions::AccessPolicy;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::KeySource;
    use crate::users::{testing::users_yaml, UserDirectory};

    const PRIVATE_PEM: &[u8] = include_bytes!("../../../libs/core/testdata/primary_private.pem");
    const PUBLIC_PEM: &[u8] = include_bytes!("../../../libs/core/testdata/primary_public.pem");

    fn test_app() -> (Router, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        ));
        let config = Config {
            port: 0,
            private_key: KeySource::Inline(String::new()),
            public_key: KeySource::Inline(String::new()),
            tokens: TokenConfig::default(),
            users_file: None,
            policy_file: None,
        };
        let state = AppState::with_parts(
            config,
            KeyMaterial::from_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap(),
            clock.clone(),
            UserDirectory::from_yaml(&users_yaml()).unwrap(),
            AccessPolicy::builtin(),
        )
        .unwrap();
        (create_router(Arc::new(state)), clock)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value, Response<()>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let (parts, body) = response.into_parts();
        let bytes = to_bytes(body, usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (parts.status, value, Response::from_parts(parts, ()))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with(uri: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn login(app: &Router, username: &str, password: &str) -> Value {
        let (status, body, _) = send(
            app,
            post_json(
                "/auth/token",
                json!({ "username": username, "password": password }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    fn bearer(body: &Value) -> String {
        format!("Bearer {}", body["access_token"].as_str().unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = test_app();
        let (status, body, _) = send(&app, get_with("/health", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_login_issues_token_pair() {
        let (app, _) = test_app();
        let body = login(&app, "alice", "alice-pw").await;

        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["expires_in"], 900);
        assert_eq!(body["access_token"].as_str().unwrap().split('.').count(), 3);
        assert_ne!(body["access_token"], body["refresh_token"]);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_rejected() {
        let (app, _) = test_app();
        let (status, body, response) = send(
            &app,
            post_json(
                "/auth/token",
                json!({ "username": "alice", "password": "nope" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "BAD_CREDENTIALS");
        assert!(body["error"]["requestId"].is_string());
        assert_eq!(
            response.headers()["x-request-id"].to_str().unwrap(),
            body["error"]["requestId"].as_str().unwrap()
        );
    }

    #[tokio::test]
    async fn test_whoami() {
        let (app, _) = test_app();
        let tokens = login(&app, "alice", "alice-pw").await;

        let (status, body, _) = send(&app, get_with("/auth/whoami", Some(&bearer(&tokens)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kind"], "authenticated");
        assert_eq!(body["id"], "u1");

        let (status, body, _) = send(&app, get_with("/auth/whoami", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kind"], "anonymous");
    }

    #[tokio::test]
    async fn test_malformed_authorization_header() {
        let (app, _) = test_app();

        for value in ["Bearer", "Basic abc", "Bearer    ", "Bearer not-a-token"] {
            let (status, body, response) = send(&app, get_with("/auth/whoami", Some(value))).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "header {:?}", value);
            assert!(body["error"]["code"].is_string());
            assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
        }

        // ASCII가 아닌 바이트
        let request = Request::get("/auth/whoami")
            .header(
                header::AUTHORIZATION,
                HeaderValue::from_bytes(b"Bearer \xFFabc").unwrap(),
            )
            .body(Body::empty())
            .unwrap();
        let (status, body, response) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
        assert_eq!(body["error"]["message"], "bad authorization string");
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[tokio::test]
    async fn test_refresh_token_cannot_authenticate() {
        let (app, _) = test_app();
        let tokens = login(&app, "alice", "alice-pw").await;
        let header = format!("Bearer {}", tokens["refresh_token"].as_str().unwrap());

        let (status, body, _) = send(&app, get_with("/auth/whoami", Some(&header))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "BAD_TOKEN");
    }

    #[tokio::test]
    async fn test_refresh_endpoint() {
        let (app, _) = test_app();
        let tokens = login(&app, "alice", "alice-pw").await;

        let (status, renewed, _) = send(
            &app,
            post_json(
                "/auth/refresh",
                json!({ "refresh_token": tokens["refresh_token"] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body, _) = send(&app, get_with("/auth/whoami", Some(&bearer(&renewed)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "u1");

        // access token은 refresh에 쓸 수 없음
        let (status, _, _) = send(
            &app,
            post_json(
                "/auth/refresh",
                json!({ "refresh_token": tokens["access_token"] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_access_token() {
        let (app, clock) = test_app();
        let tokens = login(&app, "alice", "alice-pw").await;

        clock.advance(901);
        let (status, body, _) = send(&app, get_with("/auth/whoami", Some(&bearer(&tokens)))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "BAD_TOKEN");
    }

    #[tokio::test]
    async fn test_user_detail_owner_only() {
        let (app, _) = test_app();
        let alice = bearer(&login(&app, "alice", "alice-pw").await);

        let (status, body, _) = send(&app, get_with("/users/u1", Some(&alice))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");

        let (status, body, _) = send(&app, get_with("/users/u2", Some(&alice))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn test_user_detail_admin_and_anonymous() {
        let (app, _) = test_app();
        let root = bearer(&login(&app, "root", "root-pw").await);

        let (status, body, _) = send(&app, get_with("/users/u2", Some(&root))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "u2");

        let (status, _, _) = send(&app, get_with("/users/u1", None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_user_detail_not_found_after_role_check() {
        let (app, _) = test_app();
        let alice = bearer(&login(&app, "alice", "alice-pw").await);

        let (status, body, _) = send(&app, get_with("/users/u404", Some(&alice))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        // role 검사가 먼저이므로 Anonymous는 존재 여부를 알 수 없음
        let (status, _, _) = send(&app, get_with("/users/u404", None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
