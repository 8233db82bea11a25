//! 토큰 ID(`jti`) 생성 전략
//!
//! 같은 초에 발급된 claims도 서로 구분되도록 발급마다 고유한 ID를 만듭니다.
//!
//! # 지원되는 전략
//!
//! - `ulid`: ULID (기본값, 시간순 정렬 가능)
//! - `uuid_v4`: UUID v4 (랜덤)
//! - `uuid_v7`: UUID v7 (시간순 정렬 가능)

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// ID 생성 전략
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// ULID (기본값) - 시간순 정렬 가능한 26자 문자열
    #[default]
    Ulid,

    /// UUID v4 - 완전 랜덤
    UuidV4,

    /// UUID v7 - 시간 기반, 정렬 가능
    UuidV7,
}

impl IdStrategy {
    /// 전략에 따라 ID 생성
    pub fn generate(&self) -> String {
        match self {
            IdStrategy::Ulid => ulid::Ulid::new().to_string(),
            IdStrategy::UuidV4 => uuid::Uuid::new_v4().to_string(),
            IdStrategy::UuidV7 => uuid::Uuid::now_v7().to_string(),
        }
    }
}

impl FromStr for IdStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ulid" => Ok(IdStrategy::Ulid),
            "uuid_v4" | "uuid" => Ok(IdStrategy::UuidV4),
            "uuid_v7" => Ok(IdStrategy::UuidV7),
            other => Err(Error::UnsupportedIdStrategy {
                strategy: other.to_string(),
            }),
        }
    }
}
