//! 인증/인가 진입점
//!
//! 핸들러와 미들웨어가 호출하는 네 가지 연산을 한곳에 모읍니다.
//!
//! - `create_token_pair`: 로그인 → 토큰 쌍
//! - `refresh_token_pair`: refresh token → 새 토큰 쌍
//! - `authenticate`: `Authorization` 헤더 → Identity (요청마다 한 번)
//! - `authorize`: Identity + 권한 ID (+ 리소스) → 허용/거부
//!
//! 모든 상태는 생성 후 읽기 전용이므로 `Arc<AccessControl>` 하나를 요청 간에 공유합니다.

use std::sync::Arc;

use crate::auth::{
    Authenticator, Credentials, Identity, IdentityLookup, IdentityResolver, PasswordCheck,
    TokenPair, TokenService,
};
use crate::error::Result;
use crate::permissions::{HasOwner, PermissionEngine, PermissionId};

/// 외부 협력자 묶음
pub struct Collaborators {
    pub users: Arc<dyn IdentityLookup>,
    pub passwords: Arc<dyn PasswordCheck>,
}

/// 인증/인가 진입점
pub struct AccessControl {
    tokens: Arc<TokenService>,
    authenticator: Authenticator,
    resolver: IdentityResolver,
    permissions: PermissionEngine,
}

impl AccessControl {
    pub fn new(
        tokens: TokenService,
        permissions: PermissionEngine,
        collaborators: Collaborators,
    ) -> Self {
        let tokens = Arc::new(tokens);
        Self {
            authenticator: Authenticator::new(tokens.clone(), collaborators.passwords),
            resolver: IdentityResolver::new(tokens.clone(), collaborators.users),
            tokens,
            permissions,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn permissions(&self) -> &PermissionEngine {
        &self.permissions
    }

    pub fn create_token_pair(&self, credentials: &Credentials) -> Result<TokenPair> {
        self.authenticator.create_token_pair(credentials)
    }

    pub fn refresh_token_pair(&self, refresh_token: &str) -> Result<TokenPair> {
        self.authenticator.refresh_token_pair(refresh_token)
    }

    pub fn authenticate(&self, header_value: &str) -> Result<Identity> {
        self.resolver.resolve_from_header_value(header_value)
    }

    pub fn authorize(
        &self,
        identity: &Identity,
        permission: PermissionId,
        resource: Option<&dyn HasOwner>,
    ) -> Result<()> {
        self.permissions.authorize(identity, permission, resource)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::auth::testing::{fixtures, StaticPasswords, StaticUsers};
    use crate::auth::{TokenConfig, User};
    use crate::clock::ManualClock;
    use crate::error::Error;
    use crate::permissions::AccessPolicy;

    fn access_control() -> AccessControl {
        let clock = Arc::new(ManualClock::new(
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        ));
        let tokens = TokenService::new(fixtures::primary(), TokenConfig::default(), clock).unwrap();
        let collaborators = Collaborators {
            users: Arc::new(
                StaticUsers::default()
                    .with(User::new("u1").with_username("alice"))
                    .with(User::new("u2").with_username("bob")),
            ),
            passwords: Arc::new(StaticPasswords::default().with("alice", "s3cret", "u1")),
        };
        AccessControl::new(
            tokens,
            PermissionEngine::from_policy(AccessPolicy::builtin()),
            collaborators,
        )
    }

    #[test]
    fn test_login_authenticate_authorize_flow() {
        let access = access_control();

        let pair = access
            .create_token_pair(&Credentials::new("alice", "s3cret"))
            .unwrap();
        let identity = access
            .authenticate(&format!("Bearer {}", pair.access))
            .unwrap();
        assert_eq!(identity.id(), Some("u1"));

        let own_profile = User::new("u1");
        let other_profile = User::new("u2");
        assert!(access
            .authorize(&identity, PermissionId::UserUpdate, Some(&own_profile))
            .is_ok());
        assert!(matches!(
            access.authorize(&identity, PermissionId::UserUpdate, Some(&other_profile)),
            Err(Error::PermissionDenied { .. })
        ));
    }

    #[test]
    fn test_anonymous_flow() {
        let access = access_control();
        let identity = access.authenticate("").unwrap();

        assert_eq!(identity, Identity::Anonymous);
        assert!(access
            .authorize(&identity, PermissionId::UserCreate, None)
            .is_ok());
        assert!(access
            .authorize(&identity, PermissionId::CommentCreate, None)
            .is_err());
    }

    #[test]
    fn test_refresh_flow() {
        let access = access_control();
        let pair = access
            .create_token_pair(&Credentials::new("alice", "s3cret"))
            .unwrap();

        let renewed = access.refresh_token_pair(&pair.refresh).unwrap();
        let identity = access
            .authenticate(&format!("Bearer {}", renewed.access))
            .unwrap();
        assert_eq!(identity.id(), Some("u1"));
    }
}
