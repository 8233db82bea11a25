//! Bridge 에러 타입

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Bridge 에러
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("core error: {0}")]
    Core(#[from] gk_core::Error),
}

/// 에러 응답 JSON
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            BridgeError::Unauthorized { message } => {
                (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", message.clone())
            }
            BridgeError::NotFound { message } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", message.clone())
            }
            BridgeError::Core(e) => {
                let status = StatusCode::from_u16(e.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    // 내부 사유는 로그에만
                    tracing::error!("Core error: {:?}", e);
                    (status, e.code(), "internal error".to_string())
                } else {
                    (status, e.code(), e.to_string())
                }
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                request_id: crate::middleware::current_request_id(),
            },
        };

        let mut response = (status, Json(body)).into_response();
        if self.is_authentication_failure() {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl BridgeError {
    /// 401 응답 여부 (`WWW-Authenticate` 헤더 대상)
    fn is_authentication_failure(&self) -> bool {
        match self {
            BridgeError::Unauthorized { .. } => true,
            BridgeError::Core(e) => e.is_authentication_failure(),
            BridgeError::NotFound { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
