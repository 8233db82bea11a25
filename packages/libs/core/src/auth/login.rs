//! 로그인 / 토큰 재발급 진입점
//!
//! 비밀번호 확인은 외부 협력자(`PasswordCheck`)가 담당합니다.
//! 확인에 실패하면 토큰 쌍을 절대 발급하지 않습니다.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use super::claims::TokenPair;
use super::token::TokenService;
use crate::error::{Error, Result};

/// 로그인 요청
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// 비밀번호 확인 (외부 협력자)
pub trait PasswordCheck: Send + Sync {
    /// 성공 시 subject(사용자 ID), 실패 시 `Ok(None)`
    fn check(&self, credentials: &Credentials) -> Result<Option<String>>;
}

/// 토큰 발급 진입점
pub struct Authenticator {
    tokens: Arc<TokenService>,
    passwords: Arc<dyn PasswordCheck>,
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenService>, passwords: Arc<dyn PasswordCheck>) -> Self {
        Self { tokens, passwords }
    }

    /// 로그인 → 토큰 쌍
    pub fn create_token_pair(&self, credentials: &Credentials) -> Result<TokenPair> {
        let Some(subject) = self.passwords.check(credentials)? else {
            tracing::debug!(username = %credentials.username, "login rejected");
            return Err(Error::BadCredentials);
        };

        self.tokens.issue_token_pair(&subject, self.tokens.now())
    }

    /// refresh token → 새 토큰 쌍
    pub fn refresh_token_pair(&self, refresh_token: &str) -> Result<TokenPair> {
        self.tokens
            .refresh_token_pair(refresh_token, self.tokens.now())
    }
}
