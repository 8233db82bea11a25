//! 공통 에러 타입
//!
//! Gatekit 전체에서 사용되는 에러 타입을 정의합니다.
//! 전송 계층(HTTP/gRPC) 상태 코드 변환은 호출자가 `status_code()` / `grpc_code()`로 수행합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Gatekit 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Auth Errors
    // ─────────────────────────────────────────────────────────────────────────────
    /// 형식 오류, 서명 불일치, audience 불일치, 만료된 토큰
    #[error("bad token: {reason}")]
    BadToken { reason: String },

    /// Authorization 헤더 형식 오류 (scheme, 빈 credential 등)
    #[error("unauthenticated: {reason}")]
    Unauthenticated { reason: String },

    #[error("bad credentials")]
    BadCredentials,

    // ─────────────────────────────────────────────────────────────────────────────
    // Permission Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("permission denied: {reason}")]
    PermissionDenied { reason: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Startup / Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("key material error: {message}")]
    KeyMaterial { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("unsupported id generation strategy: {strategy}")]
    UnsupportedIdStrategy { strategy: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Serialization Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn bad_token(reason: impl Into<String>) -> Self {
        Error::BadToken {
            reason: reason.into(),
        }
    }

    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Error::Unauthenticated {
            reason: reason.into(),
        }
    }

    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Error::PermissionDenied {
            reason: reason.into(),
        }
    }

    /// 인증 실패 계열인지 (401 / UNAUTHENTICATED)
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Error::BadToken { .. } | Error::Unauthenticated { .. } | Error::BadCredentials
        )
    }

    /// HTTP 상태 코드로 변환
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::Yaml(_) => 400,

            // 401 Unauthorized
            Error::BadToken { .. } | Error::Unauthenticated { .. } | Error::BadCredentials => 401,

            // 403 Forbidden
            Error::PermissionDenied { .. } => 403,

            // 500 Internal Server Error
            _ => 500,
        }
    }

    /// gRPC 상태 코드로 변환
    pub fn grpc_code(&self) -> i32 {
        match self {
            // INVALID_ARGUMENT
            Error::Yaml(_) => 3,

            // PERMISSION_DENIED
            Error::PermissionDenied { .. } => 7,

            // INTERNAL
            Error::KeyMaterial { .. }
            | Error::InvalidConfig { .. }
            | Error::Signing(_)
            | Error::UnsupportedIdStrategy { .. } => 13,

            // UNAUTHENTICATED
            Error::BadToken { .. } | Error::Unauthenticated { .. } | Error::BadCredentials => 16,
        }
    }

    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::BadToken { .. } => "BAD_TOKEN",
            Error::Unauthenticated { .. } => "UNAUTHENTICATED",
            Error::BadCredentials => "BAD_CREDENTIALS",
            Error::PermissionDenied { .. } => "PERMISSION_DENIED",
            Error::KeyMaterial { .. } => "KEY_MATERIAL_ERROR",
            Error::InvalidConfig { .. } => "INVALID_CONFIG",
            Error::Signing(_) => "SIGNING_ERROR",
            Error::UnsupportedIdStrategy { .. } => "UNSUPPORTED_ID_STRATEGY",
            Error::Yaml(_) => "YAML_ERROR",
        }
    }
}
