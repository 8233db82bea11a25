//! 로그인 / 토큰 재발급 / whoami

use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use gk_core::auth::{Credentials, Identity, TokenPair};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

/// 토큰 응답
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// access token TTL (초)
    pub expires_in: i64,
}

impl TokenResponse {
    fn new(pair: TokenPair, expires_in: i64) -> Self {
        Self {
            access_token: pair.access,
            refresh_token: pair.refresh,
            token_type: "Bearer",
            expires_in,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// `POST /auth/token`
pub async fn create_token(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>> {
    let pair = state.access.create_token_pair(&credentials)?;
    let expires_in = state.config.tokens.access_ttl_secs;
    Ok(Json(TokenResponse::new(pair, expires_in)))
}

/// `POST /auth/refresh`
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>> {
    let pair = state.access.refresh_token_pair(&request.refresh_token)?;
    let expires_in = state.config.tokens.access_ttl_secs;
    Ok(Json(TokenResponse::new(pair, expires_in)))
}

/// `GET /auth/whoami`
pub async fn whoami(Extension(identity): Extension<Identity>) -> Json<Identity> {
    Json(identity)
}
