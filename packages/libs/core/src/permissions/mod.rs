//! 권한 정책 및 평가
//!
//! # 개요
//!
//! 요청 주체가 작업(`PermissionId`)을 수행할 수 있는지 결정합니다.
//! role 기반 검사와 리소스 단위 객체 검사로 나뉘며, 둘 다 기본값은 거부입니다.
//!
//! # 모듈 구조
//!
//! - `id`: 보호되는 작업 태그
//! - `owner`: 리소스 소유자 노출 trait
//! - `roles`: role → 권한 집합
//! - `policy`: 객체 검사 종류와 정책 테이블
//! - `evaluator`: 권한 평가기

mod evaluator;
mod id;
mod owner;
mod policy;
mod roles;

pub use evaluator::PermissionEngine;
pub use id::PermissionId;
pub use owner::HasOwner;
pub use policy::{evaluate, AccessPolicy, Checker, ObjectPolicy};
pub use roles::{RoleMembership, RoleTable, ANONYMOUS_ROLE, AUTHENTICATED_ROLE};
