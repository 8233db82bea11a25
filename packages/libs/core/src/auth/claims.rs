//! 토큰 Claims
//!
//! Access Token과 Refresh Token의 페이로드 구조입니다.
//! 두 종류는 `aud` 값으로만 구분되며 같은 키로 서명됩니다.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::truncate_to_seconds;
use crate::error::{Error, Result};

/// 토큰 용도 (`aud` claim)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Access,
    Refresh,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Access => "access",
            Audience::Refresh => "refresh",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 서명된 토큰의 페이로드
///
/// 시각은 초 단위 Unix timestamp로 직렬화됩니다 (JWT 표준 claim).
/// `iat == nbf <= exp`, `exp = iat + TTL(aud)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity ID)
    pub sub: String,

    /// 용도
    pub aud: Audience,

    /// 발급 시각
    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    /// 유효 시작 시각
    #[serde(with = "chrono::serde::ts_seconds")]
    pub nbf: DateTime<Utc>,

    /// 만료 시각
    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,

    /// 발급 고유 ID
    pub jti: String,
}

impl Claims {
    /// 새 claims 생성
    ///
    /// `exp`를 표현할 수 없는 TTL은 `InvalidConfig`.
    pub fn new(
        sub: impl Into<String>,
        aud: Audience,
        now: DateTime<Utc>,
        ttl_seconds: i64,
        jti: String,
    ) -> Result<Self> {
        let iat = truncate_to_seconds(now);
        Ok(Self {
            sub: sub.into(),
            aud,
            iat,
            nbf: iat,
            exp: expiry_after(iat, ttl_seconds)?,
            jti,
        })
    }

    /// 만료 여부 (`now > exp`)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        truncate_to_seconds(now) > self.exp
    }

    /// 아직 유효 시작 전인지 (`now < nbf`)
    pub fn is_premature_at(&self, now: DateTime<Utc>) -> bool {
        truncate_to_seconds(now) < self.nbf
    }

    /// 시간 조건 검사
    pub fn check_time(&self, now: DateTime<Utc>) -> Result<()> {
        if self.is_expired_at(now) {
            return Err(Error::bad_token("token expired"));
        }
        if self.is_premature_at(now) {
            return Err(Error::bad_token("token not yet valid"));
        }
        Ok(())
    }

    /// audience 검사
    pub fn check_audience(&self, expected: Audience) -> Result<()> {
        if self.aud != expected {
            return Err(Error::bad_token(format!(
                "wrong audience: expected {}, got {}",
                expected, self.aud
            )));
        }
        Ok(())
    }

    /// 남은 TTL (초)
    pub fn remaining_ttl(&self, now: DateTime<Utc>) -> i64 {
        (self.exp - truncate_to_seconds(now)).num_seconds().max(0)
    }
}

/// `iat + ttl_seconds`
pub(crate) fn expiry_after(iat: DateTime<Utc>, ttl_seconds: i64) -> Result<DateTime<Utc>> {
    Duration::try_seconds(ttl_seconds)
        .and_then(|ttl| iat.checked_add_signed(ttl))
        .ok_or_else(|| Error::InvalidConfig {
            message: format!("token TTL out of range: {}s", ttl_seconds),
        })
}

/// 함께 발급되는 access/refresh 토큰 쌍
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}
