//! 서명 키 (KeyMaterial)
//!
//! 프로세스 시작 시 한 번 로드되는 RSA 키 쌍입니다. 이후 변경되지 않으며
//! 요청 간에 잠금 없이 공유됩니다. 키 내용은 절대 로그에 남기지 않습니다.

use std::fmt;
use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use jsonwebtoken::{crypto, Algorithm, DecodingKey, EncodingKey};

use crate::error::{Error, Result};

/// 토큰 서명 알고리즘 (access/refresh 공통)
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::RS512;

/// RSA 서명/검증 키 쌍
#[derive(Clone)]
pub struct KeyMaterial {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyMaterial {
    /// PEM 바이트에서 로드
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self> {
        let encoding = EncodingKey::from_rsa_pem(private_pem).map_err(|e| Error::KeyMaterial {
            message: format!("invalid private key: {}", e),
        })?;
        let decoding = DecodingKey::from_rsa_pem(public_pem).map_err(|e| Error::KeyMaterial {
            message: format!("invalid public key: {}", e),
        })?;

        check_pair(&encoding, &decoding)?;
        Ok(Self { encoding, decoding })
    }

    /// 설정 값(환경변수 등)에서 로드
    ///
    /// 각 값은 PEM 원문 또는 base64로 인코딩된 PEM일 수 있습니다.
    pub fn from_config_values(private_key: &str, public_key: &str) -> Result<Self> {
        let private_pem = parse_pem_value(private_key).ok_or_else(|| Error::KeyMaterial {
            message: "private key is neither PEM nor base64-encoded PEM".to_string(),
        })?;
        let public_pem = parse_pem_value(public_key).ok_or_else(|| Error::KeyMaterial {
            message: "public key is neither PEM nor base64-encoded PEM".to_string(),
        })?;

        Self::from_pem(&private_pem, &public_pem)
    }

    /// PEM 파일에서 로드
    pub fn from_files(private_path: &Path, public_path: &Path) -> Result<Self> {
        let private_pem = read_key_file(private_path)?;
        let public_pem = read_key_file(public_path)?;
        Self::from_pem(&private_pem, &public_pem)
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("algorithm", &SIGNING_ALGORITHM)
            .finish_non_exhaustive()
    }
}

/// 서명 후 검증으로 두 키가 같은 쌍인지 확인
fn check_pair(encoding: &EncodingKey, decoding: &DecodingKey) -> Result<()> {
    const PAYLOAD: &[u8] = b"gatekit-key-pair-check";

    let signature = crypto::sign(PAYLOAD, encoding, SIGNING_ALGORITHM).map_err(|e| {
        Error::KeyMaterial {
            message: format!("private key cannot sign: {}", e),
        }
    })?;

    match crypto::verify(&signature, PAYLOAD, decoding, SIGNING_ALGORITHM) {
        Ok(true) => Ok(()),
        _ => Err(Error::KeyMaterial {
            message: "private and public keys do not form a pair".to_string(),
        }),
    }
}

fn read_key_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::KeyMaterial {
        message: format!("cannot read {}: {}", path.display(), e),
    })
}

/// PEM 원문 / base64(PEM) 판별
fn parse_pem_value(raw: &str) -> Option<Vec<u8>> {
    let trimmed = raw.trim();

    if trimmed.starts_with("-----BEGIN") {
        // 환경변수에 한 줄로 넣은 경우 `\n` 이스케이프를 복원
        return Some(trimmed.replace("\\n", "\n").into_bytes());
    }

    for engine in [&general_purpose::STANDARD, &general_purpose::URL_SAFE_NO_PAD] {
        if let Ok(bytes) = engine.decode(trimmed) {
            if bytes.starts_with(b"-----BEGIN") {
                return Some(bytes);
            }
        }
    }

    None
}
