//! 시간 소스
//!
//! 토큰 발급/만료 판정에 쓰이는 현재 시각을 주입받기 위한 추상화입니다.
//! 운영 환경에서는 [`SystemClock`], 테스트에서는 [`ManualClock`]을 사용합니다.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// 현재 시각 제공자
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 시스템 시계
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 수동으로 움직이는 시계 (초 단위)
#[derive(Debug)]
pub struct ManualClock {
    secs: AtomicI64,
}

impl ManualClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            secs: AtomicI64::new(at.timestamp()),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.secs.store(at.timestamp(), Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        from_timestamp(self.secs.load(Ordering::SeqCst))
    }
}

/// 초 단위로 절삭
pub fn truncate_to_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
    from_timestamp(at.timestamp())
}

fn from_timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
