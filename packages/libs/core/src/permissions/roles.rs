//! Role 기반 권한 집합
//!
//! `anonymous`는 인증되지 않은 요청, `authenticated`는 인증된 모든 사용자에게
//! 암묵적으로 부여되는 role입니다. 인증된 사용자는 여기에 자신의 role들의
//! 권한이 합쳐집니다.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::id::PermissionId;
use crate::auth::Identity;

/// 인증되지 않은 요청의 role
pub const ANONYMOUS_ROLE: &str = "anonymous";

/// 인증된 모든 사용자의 role
pub const AUTHENTICATED_ROLE: &str = "authenticated";

/// identity → 권한 집합 (외부 협력자)
///
/// 같은 입력에 대해 항상 같은 결과를 내야 합니다.
pub trait RoleMembership: Send + Sync {
    fn permissions_of(&self, identity: &Identity) -> BTreeSet<PermissionId>;
}

/// role 이름 → 권한 집합
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleTable {
    roles: BTreeMap<String, BTreeSet<PermissionId>>,
}

impl RoleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// role 권한 등록 (기존 항목은 교체)
    pub fn with<I>(mut self, role: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = PermissionId>,
    {
        self.roles.insert(role.into(), permissions.into_iter().collect());
        self
    }

    pub fn permissions_of_role(&self, role: &str) -> Option<&BTreeSet<PermissionId>> {
        self.roles.get(role)
    }

    /// 기본 role 테이블
    pub fn builtin() -> Self {
        use PermissionId::*;

        Self::new()
            .with(ANONYMOUS_ROLE, [UserCreate, CommentList, CommentDetail])
            .with(
                AUTHENTICATED_ROLE,
                [
                    UserDetail,
                    UserUpdate,
                    UserDelete,
                    CommentCreate,
                    CommentList,
                    CommentDetail,
                    CommentUpdate,
                    CommentDelete,
                ],
            )
            .with("admin", PermissionId::ALL)
    }

    fn role_names<'a>(identity: &'a Identity) -> Vec<&'a str> {
        match identity {
            Identity::Anonymous => vec![ANONYMOUS_ROLE],
            Identity::Authenticated(user) => std::iter::once(AUTHENTICATED_ROLE)
                .chain(user.roles.iter().map(String::as_str))
                .collect(),
        }
    }
}

impl RoleMembership for RoleTable {
    fn permissions_of(&self, identity: &Identity) -> BTreeSet<PermissionId> {
        Self::role_names(identity)
            .into_iter()
            .filter_map(|role| self.roles.get(role))
            .flatten()
            .copied()
            .collect()
    }
}
