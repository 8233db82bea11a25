//! 토큰 발급 및 검증
//!
//! RS512로 서명된 access/refresh 토큰 쌍을 발급하고, 검증하고, 재발급합니다.
//!
//! # 검증 순서
//!
//! 1. 구조 및 서명 검증 (공개키)
//! 2. audience 검사 (`access` / `refresh`)
//! 3. 시간 검사 (`nbf <= now <= exp`, 주입된 시계 기준)
//!
//! 서버 측 토큰 저장소는 없습니다. refresh는 상태 없는 재발급이며,
//! 제시된 refresh token은 자체 만료 시각까지 계속 유효합니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Header, Validation};
use serde::{Deserialize, Serialize};

use super::claims::{expiry_after, Audience, Claims, TokenPair};
use super::id::IdStrategy;
use super::keys::{KeyMaterial, SIGNING_ALGORITHM};
use crate::clock::Clock;
use crate::error::{Error, Result};

/// 토큰 수명 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Access Token TTL (초)
    pub access_ttl_secs: i64,

    /// Refresh Token TTL (초)
    pub refresh_ttl_secs: i64,

    /// `jti` 생성 전략
    pub jti_strategy: IdStrategy,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_ttl_secs: 15 * 60,
            refresh_ttl_secs: 7 * 24 * 60 * 60,
            jti_strategy: IdStrategy::default(),
        }
    }
}

impl TokenConfig {
    /// `0 < access TTL < refresh TTL` 및 만료 시각 표현 범위 확인
    pub fn validate(&self) -> Result<()> {
        if self.access_ttl_secs <= 0 || self.refresh_ttl_secs <= 0 {
            return Err(Error::InvalidConfig {
                message: "token TTLs must be positive".to_string(),
            });
        }
        if self.access_ttl_secs >= self.refresh_ttl_secs {
            return Err(Error::InvalidConfig {
                message: format!(
                    "access TTL ({}s) must be shorter than refresh TTL ({}s)",
                    self.access_ttl_secs, self.refresh_ttl_secs
                ),
            });
        }
        self.check_range(Utc::now())
    }

    /// `now + TTL`이 표현 가능한지 확인
    fn check_range(&self, now: DateTime<Utc>) -> Result<()> {
        expiry_after(now, self.access_ttl_secs)?;
        expiry_after(now, self.refresh_ttl_secs)?;
        Ok(())
    }

    pub fn ttl(&self, aud: Audience) -> i64 {
        match aud {
            Audience::Access => self.access_ttl_secs,
            Audience::Refresh => self.refresh_ttl_secs,
        }
    }
}

/// 토큰 서비스
///
/// 키와 설정은 생성 후 변경되지 않으므로 `Arc`로 요청 간에 공유합니다.
pub struct TokenService {
    keys: KeyMaterial,
    config: TokenConfig,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// 새 서비스 생성 (설정 오류는 시작 시점에 실패)
    pub fn new(keys: KeyMaterial, config: TokenConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        config.check_range(clock.now())?;
        Ok(Self {
            keys,
            config,
            clock,
        })
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// 토큰 쌍 발급
    ///
    /// 두 토큰은 같은 `subject`와 `now`를 공유하고, 각자의 TTL과 `jti`를 가집니다.
    pub fn issue_token_pair(&self, subject: &str, now: DateTime<Utc>) -> Result<TokenPair> {
        let access = self.issue(subject, Audience::Access, now)?;
        let refresh = self.issue(subject, Audience::Refresh, now)?;

        tracing::debug!(subject, "issued token pair");
        Ok(TokenPair { access, refresh })
    }

    /// Access Token 검증 (현재 시계 기준)
    pub fn validate_access_token(&self, token: &str) -> Result<Claims> {
        self.validate(token, Audience::Access, self.clock.now())
    }

    /// Refresh Token 검증 (현재 시계 기준)
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims> {
        self.validate(token, Audience::Refresh, self.clock.now())
    }

    /// Refresh Token으로 새 토큰 쌍 발급
    ///
    /// 제시된 토큰은 무효화하지 않습니다 (상태 없는 재발급).
    pub fn refresh_token_pair(&self, refresh_token: &str, now: DateTime<Utc>) -> Result<TokenPair> {
        let claims = self.validate(refresh_token, Audience::Refresh, now)?;
        self.issue_token_pair(&claims.sub, now)
    }

    /// audience 제한 없이 subject 추출 (진단용)
    ///
    /// 서명만 검증하며 시간 조건은 보지 않습니다.
    pub fn get_subject(&self, token: &str) -> Result<String> {
        self.inspect(token)
            .map(|claims| claims.sub)
            .map_err(|e| Error::unauthenticated(e.to_string()))
    }

    /// 서명 검증 후 claims 디코딩 (audience/시간 검사 없음)
    pub fn inspect(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["sub", "aud", "exp", "nbf"]);

        jsonwebtoken::decode::<Claims>(token.trim(), self.keys.decoding_key(), &validation)
            .map(|data| data.claims)
            .map_err(|e| Error::bad_token(e.to_string()))
    }

    fn validate(&self, token: &str, expected: Audience, now: DateTime<Utc>) -> Result<Claims> {
        let result = self.inspect(token).and_then(|claims| {
            claims.check_audience(expected)?;
            claims.check_time(now)?;
            Ok(claims)
        });

        if let Err(e) = &result {
            tracing::debug!(audience = %expected, error = %e, "token rejected");
        }
        result
    }

    fn issue(&self, subject: &str, aud: Audience, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims::new(
            subject,
            aud,
            now,
            self.config.ttl(aud),
            self.config.jti_strategy.generate(),
        )?;

        jsonwebtoken::encode(&Header::new(SIGNING_ALGORITHM), &claims, self.keys.encoding_key())
            .map_err(Error::Signing)
    }
}
