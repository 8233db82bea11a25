//! Bridge 앱 상태

use std::sync::Arc;

use gk_core::auth::{KeyMaterial, TokenService};
use gk_core::clock::{Clock, SystemClock};
use gk_core::permissions::{AccessPolicy, PermissionEngine};
use gk_core::{AccessControl, Collaborators};

use crate::config::Config;
use crate::users::UserDirectory;

/// 앱 상태
///
/// 모든 핸들러에서 공유하는 상태입니다. 시작 후에는 읽기 전용입니다.
pub struct AppState {
    /// 설정
    pub config: Config,

    /// 인증/인가 진입점
    pub access: AccessControl,

    /// 사용자 디렉터리
    pub users: Arc<UserDirectory>,
}

impl AppState {
    /// 설정에서 상태 생성
    ///
    /// 키, 사용자 파일, 정책 파일 중 하나라도 읽지 못하면 시작을 중단합니다.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let keys = config.load_keys()?;

        let users = match &config.users_file {
            Some(path) => UserDirectory::from_file(path)?,
            None => UserDirectory::default(),
        };
        if users.is_empty() {
            tracing::warn!("user directory is empty, every login will fail");
        }

        let policy = match &config.policy_file {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
                AccessPolicy::from_yaml(&content)?
            }
            None => AccessPolicy::builtin(),
        };

        tracing::info!(users = users.len(), "user directory loaded");

        Self::with_parts(config.clone(), keys, Arc::new(SystemClock), users, policy)
    }

    /// 구성 요소에서 상태 생성
    pub fn with_parts(
        config: Config,
        keys: KeyMaterial,
        clock: Arc<dyn Clock>,
        users: UserDirectory,
        policy: AccessPolicy,
    ) -> anyhow::Result<Self> {
        let tokens = TokenService::new(keys, config.tokens.clone(), clock)?;
        let users = Arc::new(users);

        let access = AccessControl::new(
            tokens,
            PermissionEngine::from_policy(policy),
            Collaborators {
                users: users.clone(),
                passwords: users.clone(),
            },
        );

        Ok(Self {
            config,
            access,
            users,
        })
    }
}
