//! gk-core: Gatekit 인증/인가 핵심 라이브러리
//!
//! 이 크레이트는 Bridge와 CLI가 공유하는 토큰 수명 주기, 요청 주체 확인,
//! 권한 평가 로직을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `auth`: 토큰 발급/검증/재발급, 헤더 → Identity 확인, 로그인
//! - `permissions`: 권한 ID, role 테이블, 객체 검사 정책, 평가기
//! - `access`: 위 기능을 묶은 진입점
//! - `clock`: 주입 가능한 시간 소스
//! - `error`: 공통 에러 타입

pub mod access;
pub mod auth;
pub mod clock;
pub mod error;
pub mod permissions;

pub use access::{AccessControl, Collaborators};
pub use error::{Error, Result};
