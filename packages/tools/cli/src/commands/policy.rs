//! 정책 명령어

use std::path::Path;

use gk_core::permissions::AccessPolicy;

use crate::OutputFormat;

/// 적용될 정책 출력 (파일이 없으면 기본 정책)
pub fn show(file: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    let policy = load(file)?;
    println!("{}", render(&policy, format)?);
    Ok(())
}

fn load(file: Option<&Path>) -> anyhow::Result<AccessPolicy> {
    match file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
            Ok(AccessPolicy::from_yaml(&content)?)
        }
        None => Ok(AccessPolicy::builtin()),
    }
}

fn render(policy: &AccessPolicy, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(policy)?,
        OutputFormat::Text => policy.to_yaml()?,
    })
}
