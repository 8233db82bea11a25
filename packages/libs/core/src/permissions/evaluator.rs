//! 권한 평가기
//!
//! 요청 주체가 작업을 수행할 수 있는지 두 단계로 평가합니다.
//!
//! 1. `has_permission`: role 기반 권한 보유 여부
//! 2. `has_object_permission`: 특정 리소스에 대한 객체 단위 검사
//!
//! 두 단계 모두 기본값은 거부입니다 (fail-closed).

use std::sync::Arc;

use super::id::PermissionId;
use super::owner::HasOwner;
use super::policy::{evaluate, AccessPolicy, ObjectPolicy};
use super::roles::RoleMembership;
use crate::auth::Identity;
use crate::error::{Error, Result};

/// 권한 평가기
///
/// 정책은 생성 시 주입되며 이후 변경되지 않습니다.
#[derive(Clone)]
pub struct PermissionEngine {
    roles: Arc<dyn RoleMembership>,
    objects: Arc<ObjectPolicy>,
}

impl PermissionEngine {
    /// 새 평가기 생성
    pub fn new(roles: Arc<dyn RoleMembership>, objects: ObjectPolicy) -> Self {
        Self {
            roles,
            objects: Arc::new(objects),
        }
    }

    /// 정책 파일 기반 평가기 생성
    pub fn from_policy(policy: AccessPolicy) -> Self {
        Self::new(Arc::new(policy.roles), policy.objects)
    }

    /// role 기반 권한 확인
    pub fn has_permission(&self, identity: &Identity, permission: PermissionId) -> Result<()> {
        if self.roles.permissions_of(identity).contains(&permission) {
            return Ok(());
        }

        tracing::debug!(subject = ?identity.id(), %permission, "role check denied");
        Err(Error::permission_denied(format!(
            "missing permission {}",
            permission
        )))
    }

    /// 객체 단위 권한 확인 (First Allow Wins)
    ///
    /// 등록 순서대로 검사하여 처음 허용한 검사에서 멈춥니다.
    /// 등록된 검사가 없거나 모두 거부하면 거부합니다.
    pub fn has_object_permission(
        &self,
        identity: &Identity,
        permission: PermissionId,
        resource: &dyn HasOwner,
    ) -> Result<()> {
        let Some(checkers) = self.objects.checkers(permission) else {
            tracing::debug!(%permission, "no object policy registered");
            return Err(Error::permission_denied(format!(
                "no object policy for {}",
                permission
            )));
        };

        if checkers
            .iter()
            .any(|checker| evaluate(checker, resource, identity))
        {
            return Ok(());
        }

        tracing::debug!(subject = ?identity.id(), %permission, "object check denied");
        Err(Error::permission_denied(format!(
            "no checker granted {}",
            permission
        )))
    }

    /// role 검사 후, 리소스가 있으면 객체 검사까지 수행
    pub fn authorize(
        &self,
        identity: &Identity,
        permission: PermissionId,
        resource: Option<&dyn HasOwner>,
    ) -> Result<()> {
        self.has_permission(identity, permission)?;
        match resource {
            Some(resource) => self.has_object_permission(identity, permission, resource),
            None => Ok(()),
        }
    }
}
