//! 요청 주체 확인
//!
//! `Authorization` 헤더 값에서 bearer 토큰을 꺼내 검증하고,
//! 외부 조회기(`IdentityLookup`)로 토큰의 subject를 실제 사용자로 채웁니다.
//!
//! # 처리 규칙
//!
//! 1. 빈 헤더 → `Identity::Anonymous` (에러 아님)
//! 2. 첫 공백 기준 `(scheme, credential)` 분리, 실패 시 `Unauthenticated`
//! 3. scheme이 `bearer`(대소문자 무시)가 아니면 `Unauthenticated`
//! 4. credential이 공백뿐이면 `Unauthenticated`
//! 5. access token 검증 후 subject 조회 → `Identity::Authenticated`

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::token::TokenService;
use crate::error::{Error, Result};

/// 인증된 사용자
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// 사용자 ID (토큰의 `sub`)
    pub id: String,

    /// 표시용 이름
    #[serde(default)]
    pub username: String,

    /// Role 목록
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: String::new(),
            roles: Vec::new(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }
}

/// 요청 주체
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    /// 자격 증명 없이 들어온 요청
    Anonymous,

    /// access token으로 인증된 사용자
    Authenticated(User),
}

impl Identity {
    /// 사용자 ID (Anonymous는 None)
    pub fn id(&self) -> Option<&str> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(user) => Some(&user.id),
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    /// Role 목록
    pub fn roles(&self) -> &[String] {
        match self {
            Identity::Anonymous => &[],
            Identity::Authenticated(user) => &user.roles,
        }
    }

    /// 특정 role 보유 확인
    pub fn has_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| r == role)
    }
}

/// subject → 사용자 조회 (외부 협력자)
pub trait IdentityLookup: Send + Sync {
    /// 없는 사용자는 `Ok(None)`
    fn by_id(&self, subject: &str) -> Result<Option<User>>;
}

/// `Authorization` 헤더의 bearer 토큰
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    /// 헤더 값에서 토큰 추출
    ///
    /// 빈 값은 `Ok(None)` (자격 증명 없음).
    pub fn from_header_value(value: &str) -> Result<Option<Self>> {
        if value.is_empty() {
            return Ok(None);
        }

        let (scheme, credential) = value
            .split_once(' ')
            .ok_or_else(|| Error::unauthenticated("bad authorization string"))?;

        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(Error::unauthenticated("request unauthenticated with bearer"));
        }

        let credential = credential.trim();
        if credential.is_empty() {
            return Err(Error::unauthenticated("empty bearer token"));
        }

        Ok(Some(BearerToken(credential.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 요청 주체 확인기
pub struct IdentityResolver {
    tokens: Arc<TokenService>,
    users: Arc<dyn IdentityLookup>,
}

impl IdentityResolver {
    pub fn new(tokens: Arc<TokenService>, users: Arc<dyn IdentityLookup>) -> Self {
        Self { tokens, users }
    }

    /// 헤더 값 → Identity
    pub fn resolve_from_header_value(&self, header_value: &str) -> Result<Identity> {
        let Some(token) = BearerToken::from_header_value(header_value)? else {
            return Ok(Identity::Anonymous);
        };

        let claims = self.tokens.validate_access_token(token.as_str())?;

        match self.users.by_id(&claims.sub)? {
            Some(user) => Ok(Identity::Authenticated(user)),
            None => {
                tracing::debug!(subject = %claims.sub, "token subject not found");
                Err(Error::unauthenticated("user not found"))
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::testing::StaticUsers;
    use super::*;
    use crate::auth::keys::fixtures;
    use crate::auth::TokenConfig;
    use crate::clock::ManualClock;

    fn resolver() -> (IdentityResolver, Arc<TokenService>) {
        let clock = Arc::new(ManualClock::new(
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        ));
        let tokens =
            Arc::new(TokenService::new(fixtures::primary(), TokenConfig::default(), clock).unwrap());
        let users = StaticUsers::default().with(User::new("u1").with_roles(["admin"]));
        (IdentityResolver::new(tokens.clone(), Arc::new(users)), tokens)
    }

    #[test]
    fn test_bearer_from_header_value() {
        assert_eq!(BearerToken::from_header_value("").unwrap(), None);
        assert_eq!(
            BearerToken::from_header_value("Bearer abc").unwrap(),
            Some(BearerToken("abc".to_string()))
        );
        assert_eq!(
            BearerToken::from_header_value("bEaReR   abc  ").unwrap(),
            Some(BearerToken("abc".to_string()))
        );
    }

    #[test]
    fn test_bearer_rejects_bad_strings() {
        for value in ["Bearer", "Bearer ", "Bearer    ", "Basic abc", "abc"] {
            let err = BearerToken::from_header_value(value).unwrap_err();
            assert!(matches!(err, Error::Unauthenticated { .. }), "{}", value);
        }
    }

    #[test]
    fn test_bad_authorization_string_reason() {
        let err = BearerToken::from_header_value("Bearer").unwrap_err();
        assert!(err.to_string().contains("bad authorization string"));
    }

    #[test]
    fn test_empty_header_is_anonymous() {
        let (resolver, _) = resolver();
        assert_eq!(resolver.resolve_from_header_value("").unwrap(), Identity::Anonymous);
    }

    #[test]
    fn test_transport_errors() {
        let (resolver, _) = resolver();
        for value in ["Bearer ", "Basic abc"] {
            assert!(matches!(
                resolver.resolve_from_header_value(value),
                Err(Error::Unauthenticated { .. })
            ));
        }
    }

    #[test]
    fn test_valid_token_resolves_user() {
        let (resolver, tokens) = resolver();
        let pair = tokens.issue_token_pair("u1", tokens.now()).unwrap();

        let identity = resolver
            .resolve_from_header_value(&format!("Bearer {}", pair.access))
            .unwrap();
        assert_eq!(identity.id(), Some("u1"));
        assert!(identity.has_role("admin"));
    }

    #[test]
    fn test_bad_token_propagates() {
        let (resolver, tokens) = resolver();
        let pair = tokens.issue_token_pair("u1", tokens.now()).unwrap();

        assert!(matches!(
            resolver.resolve_from_header_value("Bearer not-a-token"),
            Err(Error::BadToken { .. })
        ));
        assert!(matches!(
            resolver.resolve_from_header_value(&format!("Bearer {}", pair.refresh)),
            Err(Error::BadToken { .. })
        ));
    }

    #[test]
    fn test_unknown_subject_is_unauthenticated() {
        let (resolver, tokens) = resolver();
        let pair = tokens.issue_token_pair("ghost", tokens.now()).unwrap();

        let err = resolver
            .resolve_from_header_value(&format!("Bearer {}", pair.access))
            .unwrap_err();
        assert!(matches!(err, Error::Unauthenticated { .. }));
    }

    #[test]
    fn test_identity_accessors() {
        let anon = Identity::Anonymous;
        assert_eq!(anon.id(), None);
        assert!(!anon.is_authenticated());
        assert!(anon.roles().is_empty());

        let user = Identity::Authenticated(User::new("u1").with_roles(["writer"]));
        assert!(user.is_authenticated());
        assert!(user.has_role("writer"));
        assert!(!user.has_role("admin"));
    }
}
