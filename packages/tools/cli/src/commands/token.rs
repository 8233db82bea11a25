//! 토큰 명령어
//!
//! 발급/검증/재발급과 서명만 확인하는 inspect를 제공합니다.
//! 토큰 원문은 `issue`/`refresh` 결과로만 출력합니다.

use chrono::{DateTime, SecondsFormat, Utc};
use gk_core::auth::{Claims, TokenPair, TokenService};
use serde_json::json;

use crate::OutputFormat;

pub fn issue(service: &TokenService, subject: &str, format: OutputFormat) -> anyhow::Result<()> {
    let pair = service.issue_token_pair(subject, service.now())?;
    println!("{}", render_pair(&pair, service, format)?);
    Ok(())
}

pub fn verify(
    service: &TokenService,
    token: &str,
    refresh: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let claims = if refresh {
        service.validate_refresh_token(token)?
    } else {
        service.validate_access_token(token)?
    };
    println!("{}", render_claims(&claims, service.now(), format)?);
    Ok(())
}

pub fn inspect(service: &TokenService, token: &str, format: OutputFormat) -> anyhow::Result<()> {
    let claims = service.inspect(token)?;
    println!("{}", render_claims(&claims, service.now(), format)?);
    Ok(())
}

pub fn refresh(service: &TokenService, token: &str, format: OutputFormat) -> anyhow::Result<()> {
    let pair = service.refresh_token_pair(token, service.now())?;
    println!("{}", render_pair(&pair, service, format)?);
    Ok(())
}

fn render_pair(
    pair: &TokenPair,
    service: &TokenService,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let expires_in = service.config().access_ttl_secs;
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "access_token": pair.access,
            "refresh_token": pair.refresh,
            "token_type": "Bearer",
            "expires_in": expires_in,
        }))?,
        OutputFormat::Text => format!(
            "access_token:  {}\nrefresh_token: {}\nexpires_in:    {}s",
            pair.access, pair.refresh, expires_in
        ),
    })
}

fn render_claims(claims: &Claims, now: DateTime<Utc>, format: OutputFormat) -> anyhow::Result<String> {
    let remaining = claims.remaining_ttl(now);
    Ok(match format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(claims)?;
            value["expired"] = json!(claims.is_expired_at(now));
            value["remaining_secs"] = json!(remaining);
            serde_json::to_string_pretty(&value)?
        }
        OutputFormat::Text => {
            let status = if claims.is_expired_at(now) {
                "expired".to_string()
            } else {
                format!("{}s remaining", remaining)
            };
            [
                format!("subject:  {}", claims.sub),
                format!("audience: {}", claims.aud),
                format!("issued:   {}", rfc3339(claims.iat)),
                format!("valid:    {} .. {}", rfc3339(claims.nbf), rfc3339(claims.exp)),
                format!("jti:      {}", claims.jti),
                format!("status:   {}", status),
            ]
            .join("\n")
        }
    })
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gk_core::auth::{Audience, KeyMaterial, TokenConfig};
    use gk_core::clock::ManualClock;

    use super::*;

    const PRIVATE_PEM: &[u8] = include_bytes!("../../../../libs/core/testdata/primary_private.pem");
    const PUBLIC_PEM: &[u8] = include_bytes!("../../../../libs/core/testdata/primary_public.pem");

    fn service(clock: Arc<ManualClock>) -> TokenService {
        let keys = KeyMaterial::from_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap();
        TokenService::new(keys, TokenConfig::default(), clock).unwrap()
    }

    #[test]
    fn test_render_claims_text() {
        let t0 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = Arc::new(ManualClock::new(t0));
        let service = service(clock.clone());
        let pair = service.issue_token_pair("u1", t0).unwrap();
        let claims = service.inspect(&pair.access).unwrap();
        assert_eq!(claims.aud, Audience::Access);

        let text = render_claims(&claims, t0, OutputFormat::Text).unwrap();
        assert!(text.contains("subject:  u1"));
        assert!(text.contains("audience: access"));
        assert!(text.contains("900s remaining"));

        clock.advance(1000);
        let text = render_claims(&claims, service.now(), OutputFormat::Text).unwrap();
        assert!(text.contains("status:   expired"));
    }

    #[test]
    fn test_render_claims_json() {
        let t0 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let service = service(Arc::new(ManualClock::new(t0)));
        let pair = service.issue_token_pair("u1", t0).unwrap();
        let claims = service.validate_refresh_token(&pair.refresh).unwrap();

        let rendered = render_claims(&claims, t0, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["sub"], "u1");
        assert_eq!(value["aud"], "refresh");
        assert_eq!(value["expired"], false);
        assert_eq!(value["remaining_secs"], 604800);
    }

    #[test]
    fn test_render_pair_json() {
        let t0 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let service = service(Arc::new(ManualClock::new(t0)));
        let pair = service.issue_token_pair("u1", t0).unwrap();

        let rendered = render_pair(&pair, &service, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["access_token"], pair.access.as_str());
        assert_eq!(value["token_type"], "Bearer");
        assert_eq!(value["expires_in"], 900);
    }
}
