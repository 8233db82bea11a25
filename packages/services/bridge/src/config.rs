//! Bridge 설정

use std::env;
use std::fmt;
use std::path::PathBuf;

use gk_core::auth::{IdStrategy, KeyMaterial, TokenConfig};

/// 키 위치
#[derive(Clone)]
pub enum KeySource {
    /// PEM 원문 또는 base64(PEM)
    Inline(String),

    /// PEM 파일 경로
    File(PathBuf),
}

impl KeySource {
    fn from_env(value_var: &str, path_var: &str) -> anyhow::Result<Self> {
        if let Ok(value) = env::var(value_var) {
            if !value.trim().is_empty() {
                return Ok(KeySource::Inline(value));
            }
        }
        env::var(path_var)
            .map(|p| KeySource::File(PathBuf::from(p)))
            .map_err(|_| anyhow::anyhow!("either {} or {} must be set", value_var, path_var))
    }
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Inline(_) => f.write_str("Inline(<redacted>)"),
            KeySource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Bridge 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 서버 포트
    pub port: u16,

    /// 서명 키
    pub private_key: KeySource,

    /// 검증 키
    pub public_key: KeySource,

    /// 토큰 TTL / jti 전략
    pub tokens: TokenConfig,

    /// 사용자 디렉터리 YAML
    pub users_file: Option<PathBuf>,

    /// 권한 정책 YAML (없으면 기본 정책)
    pub policy_file: Option<PathBuf>,
}

impl Config {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = TokenConfig::default();

        Ok(Self {
            port: env::var("GK_BRIDGE_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,

            private_key: KeySource::from_env("GK_PRIVATE_KEY", "GK_PRIVATE_KEY_PATH")?,

            public_key: KeySource::from_env("GK_PUBLIC_KEY", "GK_PUBLIC_KEY_PATH")?,

            tokens: TokenConfig {
                access_ttl_secs: env::var("GK_ACCESS_TTL_SECS")
                    .ok()
                    .map(|v| v.parse())
                    .transpose()?
                    .unwrap_or(defaults.access_ttl_secs),

                refresh_ttl_secs: env::var("GK_REFRESH_TTL_SECS")
                    .ok()
                    .map(|v| v.parse())
                    .transpose()?
                    .unwrap_or(defaults.refresh_ttl_secs),

                jti_strategy: env::var("GK_JTI_STRATEGY")
                    .ok()
                    .map(|v| v.parse::<IdStrategy>())
                    .transpose()?
                    .unwrap_or(defaults.jti_strategy),
            },

            users_file: env::var("GK_USERS_FILE").ok().map(PathBuf::from),

            policy_file: env::var("GK_POLICY_FILE").ok().map(PathBuf::from),
        })
    }

    /// 키 로드 (실패 시 시작 중단)
    pub fn load_keys(&self) -> anyhow::Result<KeyMaterial> {
        let keys = match (&self.private_key, &self.public_key) {
            (KeySource::File(private), KeySource::File(public)) => {
                KeyMaterial::from_files(private, public)?
            }
            (private, public) => {
                KeyMaterial::from_config_values(&read_source(private)?, &read_source(public)?)?
            }
        };
        Ok(keys)
    }
}

fn read_source(source: &KeySource) -> anyhow::Result<String> {
    match source {
        KeySource::Inline(value) => Ok(value.clone()),
        KeySource::File(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e)),
    }
}
