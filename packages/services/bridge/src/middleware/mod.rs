//! Bridge 미들웨어
//!
//! 요청 ID 부여와 요청 주체 확인을 담당합니다.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header::AUTHORIZATION, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::error::BridgeError;
use crate::state::AppState;

tokio::task_local! {
    static REQUEST_ID: String;
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

pub async fn request_id(req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    let mut resp = REQUEST_ID.scope(id.clone(), async move { next.run(req).await }).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert("x-request-id", value);
    }
    resp
}

/// 요청 주체 확인
///
/// 요청마다 한 번 `Authorization` 헤더를 해석해 `Identity`를 extensions에 넣습니다.
/// 헤더가 없으면 Anonymous로 진행합니다.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, BridgeError> {
    let header_value = match req.headers().get(AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .map_err(|_| BridgeError::Unauthorized {
                message: "bad authorization string".to_string(),
            })?
            .to_string(),
        None => String::new(),
    };

    let identity = state.access.authenticate(&header_value)?;
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
