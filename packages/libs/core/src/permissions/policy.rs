//! 권한 정책 정의
//!
//! 권한 ID별 객체 검사 목록(`ObjectPolicy`)과 role별 권한 집합(`RoleTable`)을 묶은
//! 정책 파일(`AccessPolicy`)의 구조를 정의합니다. 정책은 시작 시 한 번 만들어지고
//! 이후 읽기 전용으로 공유됩니다.
//!
//! ```yaml
//! roles:
//!   anonymous: [user_create]
//!   admin: [user_list, user_detail]
//! objects:
//!   user_detail: [owner, "role:admin"]
//!   user_list: [nobody]
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::id::PermissionId;
use super::owner::HasOwner;
use super::roles::RoleTable;
use crate::auth::Identity;
use crate::error::{Error, Result};

/// 객체 단위 검사 종류
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checker {
    /// 항상 허용 (Anonymous 포함)
    Anybody,

    /// 항상 거부
    Nobody,

    /// 리소스 소유자만 허용
    Owner,

    /// 소유자가 없는 리소스는 누구나, 있으면 소유자만 허용
    OwnerOrPublic,

    /// 특정 role 보유자 허용
    Role(String),
}

impl Checker {
    /// 검사 실행
    pub fn allows(&self, resource: &dyn HasOwner, identity: &Identity) -> bool {
        match self {
            Checker::Anybody => true,
            Checker::Nobody => false,
            Checker::Owner => is_owner(resource, identity),
            Checker::OwnerOrPublic => {
                resource.owner_id().is_none() || is_owner(resource, identity)
            }
            Checker::Role(role) => identity.has_role(role),
        }
    }
}

/// 단일 검사 평가
pub fn evaluate(checker: &Checker, resource: &dyn HasOwner, identity: &Identity) -> bool {
    checker.allows(resource, identity)
}

fn is_owner(resource: &dyn HasOwner, identity: &Identity) -> bool {
    match (identity.id(), resource.owner_id()) {
        (Some(id), Some(owner)) => id == owner,
        _ => false,
    }
}

impl fmt::Display for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Checker::Anybody => f.write_str("anybody"),
            Checker::Nobody => f.write_str("nobody"),
            Checker::Owner => f.write_str("owner"),
            Checker::OwnerOrPublic => f.write_str("owner_or_public"),
            Checker::Role(role) => write!(f, "role:{}", role),
        }
    }
}

impl FromStr for Checker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "anybody" => Ok(Checker::Anybody),
            "nobody" => Ok(Checker::Nobody),
            "owner" => Ok(Checker::Owner),
            "owner_or_public" => Ok(Checker::OwnerOrPublic),
            other => match other.strip_prefix("role:") {
                Some(role) if !role.is_empty() => Ok(Checker::Role(role.to_string())),
                _ => Err(Error::InvalidConfig {
                    message: format!("unknown checker: {}", other),
                }),
            },
        }
    }
}

impl Serialize for Checker {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Checker {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// 권한 ID → 순서 있는 검사 목록
///
/// 항목이 없는 권한 ID는 "객체 검사 미설정"이며 평가 시 거부됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectPolicy {
    entries: BTreeMap<PermissionId, Vec<Checker>>,
}

impl ObjectPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// 검사 목록 등록 (기존 항목은 교체)
    pub fn with(mut self, permission: PermissionId, checkers: Vec<Checker>) -> Self {
        self.entries.insert(permission, checkers);
        self
    }

    /// 등록된 검사 목록
    pub fn checkers(&self, permission: PermissionId) -> Option<&[Checker]> {
        self.entries.get(&permission).map(Vec::as_slice)
    }

    /// 기본 정책
    pub fn builtin() -> Self {
        use Checker::*;
        use PermissionId::*;

        let admin = || Role("admin".to_string());

        Self::new()
            .with(UserCreate, vec![Anybody])
            .with(UserList, vec![Nobody])
            .with(UserDetail, vec![Owner, admin()])
            .with(UserUpdate, vec![Owner, admin()])
            .with(UserDelete, vec![Owner, admin()])
            .with(CommentCreate, vec![Anybody])
            .with(CommentList, vec![Nobody])
            .with(CommentDetail, vec![OwnerOrPublic, admin()])
            .with(CommentUpdate, vec![Owner, admin()])
            .with(CommentDelete, vec![Owner, admin()])
    }
}

/// 전체 권한 정책
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// role별 권한 집합
    #[serde(default)]
    pub roles: RoleTable,

    /// 권한 ID별 객체 검사
    #[serde(default)]
    pub objects: ObjectPolicy,
}

impl AccessPolicy {
    /// 기본 정책
    pub fn builtin() -> Self {
        Self {
            roles: RoleTable::builtin(),
            objects: ObjectPolicy::builtin(),
        }
    }

    /// YAML에서 파싱
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// YAML로 직렬화
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
