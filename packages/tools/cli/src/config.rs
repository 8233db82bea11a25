//! CLI 설정
//!
//! 키는 `--private-key` / `--public-key` 플래그가 우선이고, 없으면 Bridge와 같은
//! 환경변수(`GK_PRIVATE_KEY[_PATH]`, `GK_PUBLIC_KEY[_PATH]`)를 사용합니다.
//! 플래그 값은 파일 경로이거나 PEM 원문(또는 base64 PEM)입니다.

use std::path::Path;
use std::sync::Arc;

use gk_core::auth::{IdStrategy, KeyMaterial, TokenConfig, TokenService};
use gk_core::clock::SystemClock;

/// CLI 설정
#[derive(Debug, Clone)]
pub struct CliConfig {
    private_key: String,
    public_key: String,
    pub tokens: TokenConfig,
}

impl CliConfig {
    /// 플래그 + 환경변수에서 설정 로드
    pub fn load(private_key: Option<&str>, public_key: Option<&str>) -> anyhow::Result<Self> {
        let private_key = resolve_key(private_key, "GK_PRIVATE_KEY", "GK_PRIVATE_KEY_PATH")?;
        let public_key = resolve_key(public_key, "GK_PUBLIC_KEY", "GK_PUBLIC_KEY_PATH")?;

        let mut tokens = TokenConfig::default();
        if let Ok(value) = std::env::var("GK_ACCESS_TTL_SECS") {
            tokens.access_ttl_secs = value.parse()?;
        }
        if let Ok(value) = std::env::var("GK_REFRESH_TTL_SECS") {
            tokens.refresh_ttl_secs = value.parse()?;
        }
        if let Ok(value) = std::env::var("GK_JTI_STRATEGY") {
            tokens.jti_strategy = value.parse::<IdStrategy>()?;
        }

        Ok(Self {
            private_key,
            public_key,
            tokens,
        })
    }

    /// 토큰 서비스 생성 (시스템 시계)
    pub fn token_service(&self) -> anyhow::Result<TokenService> {
        let keys = KeyMaterial::from_config_values(&self.private_key, &self.public_key)?;
        tracing::debug!(
            access_ttl_secs = self.tokens.access_ttl_secs,
            refresh_ttl_secs = self.tokens.refresh_ttl_secs,
            "key material loaded"
        );
        Ok(TokenService::new(
            keys,
            self.tokens.clone(),
            Arc::new(SystemClock),
        )?)
    }
}

fn resolve_key(flag: Option<&str>, value_var: &str, path_var: &str) -> anyhow::Result<String> {
    if let Some(flag) = flag {
        return read_key_value(flag);
    }
    if let Ok(value) = std::env::var(value_var) {
        if !value.trim().is_empty() {
            return Ok(value);
        }
    }
    match std::env::var(path_var) {
        Ok(path) => read_key_file(Path::new(&path)),
        Err(_) => anyhow::bail!(
            "key not configured: pass a flag or set {} / {}",
            value_var,
            path_var
        ),
    }
}

/// 존재하는 파일 경로면 파일 내용, 아니면 값 그대로
fn read_key_value(value: &str) -> anyhow::Result<String> {
    let path = Path::new(value);
    if path.is_file() {
        read_key_file(path)
    } else {
        Ok(value.to_string())
    }
}

fn read_key_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))
}
