//! 인증 관련 타입 및 로직
//!
//! # 개요
//!
//! 토큰 수명 주기와 요청 주체 확인을 담당합니다.
//!
//! # 토큰 종류
//!
//! - **Access Token**: 요청마다 `Authorization: Bearer ...`로 제시 (짧은 TTL)
//! - **Refresh Token**: 새 토큰 쌍 재발급용 (긴 TTL)
//!
//! 두 토큰 모두 RS512 JWT이며 `aud` claim(`access` / `refresh`)으로만 구분됩니다.

mod claims;
mod id;
mod identity;
mod keys;
mod login;
mod token;

pub use claims::{Audience, Claims, TokenPair};
pub use id::IdStrategy;
pub use identity::{BearerToken, Identity, IdentityLookup, IdentityResolver, User};
pub use keys::{KeyMaterial, SIGNING_ALGORITHM};
pub use login::{Authenticator, Credentials, PasswordCheck};
pub use token::{TokenConfig, TokenService};
